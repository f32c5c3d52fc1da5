use crate::error::GameError;

/// Display name as entered on the title screen: trimmed, never empty, and cut
/// to the configured length (the text box enforces the same limit).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn parse(raw: &str, max_len: usize) -> Result<Self, GameError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(GameError::EmptyName);
        }
        let cut: String = trimmed.chars().take(max_len.max(1)).collect();
        Ok(Self(cut.trim_end().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_truncates() {
        assert_eq!(PlayerName::parse("  ada  ", 12).unwrap().as_str(), "ada");
        assert_eq!(
            PlayerName::parse("abcdefghijklmnop", 12).unwrap().as_str(),
            "abcdefghijkl"
        );
        // cut lands on a space: no trailing whitespace survives
        assert_eq!(PlayerName::parse("abc def", 4).unwrap().as_str(), "abc");
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(PlayerName::parse("汉字汉字", 2).unwrap().as_str(), "汉字");
    }

    #[test]
    fn blank_is_rejected() {
        assert_eq!(PlayerName::parse("   ", 12), Err(GameError::EmptyName));
        assert_eq!(PlayerName::parse("", 12), Err(GameError::EmptyName));
    }
}
