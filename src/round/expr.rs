// Operands, operators and the expressions a player builds from them.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// One of the three selectable operands (1, 2 or 3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Operand(u8);

impl Operand {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 3;
    pub const ALL: [Operand; 3] = [Operand(1), Operand(2), Operand(3)];

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Operand {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("operand {value} outside 1..=3"))
    }
}

impl From<Operand> for u8 {
    fn from(op: Operand) -> u8 {
        op.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Plus,
    Minus,
}

impl Operator {
    pub const ALL: [Operator; 2] = [Operator::Plus, Operator::Minus];

    /// Signed result before the absolute value is taken.
    pub fn apply(self, left: u8, right: u8) -> i16 {
        let (l, r) = (left as i16, right as i16);
        match self {
            Operator::Plus => l + r,
            Operator::Minus => l - r,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Plus => '+',
            Operator::Minus => '-',
        }
    }

    /// Accepts ASCII `+`/`-` as well as the typographic minus.
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Plus),
            '-' | '\u{2212}' => Some(Operator::Minus),
            _ => None,
        }
    }
}

/// A complete expression `|left op right|`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guess {
    pub left: Operand,
    pub operator: Operator,
    pub right: Operand,
}

impl Guess {
    pub fn new(left: Operand, operator: Operator, right: Operand) -> Self {
        Self { left, operator, right }
    }

    pub fn evaluate(&self) -> u8 {
        evaluate(self)
    }
}

impl std::fmt::Display for Guess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "|{} {} {}|",
            self.left.value(),
            self.operator.symbol(),
            self.right.value()
        )
    }
}

/// Computes `|left op right|`. Always non-negative.
pub fn evaluate(guess: &Guess) -> u8 {
    // operands are at most 3, so the magnitude fits comfortably in u8
    guess
        .operator
        .apply(guess.left.value(), guess.right.value())
        .unsigned_abs() as u8
}

/// A guess under construction; any field may still be unset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GuessDraft {
    pub left: Option<Operand>,
    pub operator: Option<Operator>,
    pub right: Option<Operand>,
}

impl GuessDraft {
    pub fn new(left: Option<Operand>, operator: Option<Operator>, right: Option<Operand>) -> Self {
        Self { left, operator, right }
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.operator.is_none() && self.right.is_none()
    }

    /// The finished guess, or `None` while any field is unset.
    pub fn complete(&self) -> Option<Guess> {
        Some(Guess::new(self.left?, self.operator?, self.right?))
    }
}

impl From<Guess> for GuessDraft {
    fn from(g: Guess) -> Self {
        Self::new(Some(g.left), Some(g.operator), Some(g.right))
    }
}

// --- Targets -----------------------------------------------------------------

/// Distinct values of `|a ± b|` over every operand pair, ascending.
pub fn target_values() -> &'static [u8] {
    static VALUES: OnceLock<Vec<u8>> = OnceLock::new();
    VALUES.get_or_init(|| {
        let mut values: Vec<u8> = Operand::ALL
            .iter()
            .flat_map(|&a| {
                Operand::ALL.iter().flat_map(move |&b| {
                    Operator::ALL
                        .iter()
                        .map(move |&op| evaluate(&Guess::new(a, op, b)))
                })
            })
            .collect();
        values.sort_unstable();
        values.dedup();
        values
    })
}

/// Samples uniformly over the distinct target values, so 0 and 6 are as likely
/// as 2 even though far fewer operand pairs produce them.
pub fn generate_target<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    let values = target_values();
    values[rng.gen_range(0..values.len())]
}
