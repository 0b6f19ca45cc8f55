use core::fmt;
use std::io::Write;

use serde::{
    de::{self, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::error::RuntimeError;

// JSON has no infinities or NaN, those are written the way the protocol
// writes them: "inf", "-inf" and "NaN"
mod number {
    use super::*;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_str(&value.to_string())
        }
    }

    struct NumberVisitor;

    impl<'de> Visitor<'de> for NumberVisitor {
        type Value = f64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a number, \"inf\", \"-inf\" or \"NaN\"")
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<f64, E> {
            Ok(value)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<f64, E> {
            Ok(value as f64)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<f64, E> {
            Ok(value as f64)
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<f64, E> {
            match value {
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                "NaN" => Ok(f64::NAN),
                _ => Err(E::invalid_value(de::Unexpected::Str(value), &self)),
            }
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        deserializer.deserialize_any(NumberVisitor)
    }
}

/// A primitive drawing instruction for the turtle renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Home,
    PenUp,
    PenDown,
    PushState,
    PopState,
    Move(#[serde(with = "number")] f64),
    /// Degrees, positive turns left.
    Rotate(#[serde(with = "number")] f64),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => write!(f, "H"),
            Self::PenUp => write!(f, "U"),
            Self::PenDown => write!(f, "D"),
            Self::PushState => write!(f, "["),
            Self::PopState => write!(f, "]"),
            Self::Move(distance) => write!(f, "M {}", distance),
            Self::Rotate(angle) => write!(f, "R {}", angle),
        }
    }
}

/// Receives commands in execution order.
pub trait CommandSink {
    fn emit(&mut self, command: Command) -> Result<(), RuntimeError>;
}

impl CommandSink for Vec<Command> {
    fn emit(&mut self, command: Command) -> Result<(), RuntimeError> {
        self.push(command);
        Ok(())
    }
}

/// Writes each command as one protocol line.
pub struct ProtocolWriter<W: Write> {
    writer: W,
}

impl<W: Write> ProtocolWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> CommandSink for ProtocolWriter<W> {
    fn emit(&mut self, command: Command) -> Result<(), RuntimeError> {
        writeln!(self.writer, "{}", command)?;
        Ok(())
    }
}
