/*!
 * Signal Formatting
 * Field selection and text rendering for throw records
 */

use super::types::ThrowRecord;
use crate::core::errors::{ConfigError, ThrowResult};
use bitflags::bitflags;
use std::fmt;

/// Separator between rendered fields
pub const FIELD_SEPARATOR: &str = " | ";

bitflags! {
    /// Set of record fields to render
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ThrowFields: u8 {
        const MODE = 1 << 0;
        const KIND = 1 << 1;
        const IDENTIFIER = 1 << 2;
        const MESSAGE = 1 << 3;
        const STACK_TRACE = 1 << 4;
        const INNER = 1 << 5;

        /// `identifier | message`
        const BASIC = Self::IDENTIFIER.bits() | Self::MESSAGE.bits();
        /// `mode | kind | identifier | message`
        const TEST = Self::MODE.bits() | Self::KIND.bits() | Self::BASIC.bits();
        /// Every field
        const FORENSIC = Self::TEST.bits() | Self::STACK_TRACE.bits() | Self::INNER.bits();
    }
}

impl ThrowFields {
    /// Parse a preset name (`basic`, `test`, `forensic`)
    pub fn parse(preset: &str) -> ThrowResult<Self> {
        match preset.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(ThrowFields::BASIC),
            "test" => Ok(ThrowFields::TEST),
            "forensic" => Ok(ThrowFields::FORENSIC),
            _ => Err(ConfigError::UnknownPreset(preset.to_string())),
        }
    }
}

impl Default for ThrowFields {
    fn default() -> Self {
        ThrowFields::BASIC
    }
}

/// Render order; each entry is a single-bit field
const ORDER: [ThrowFields; 6] = [
    ThrowFields::MODE,
    ThrowFields::KIND,
    ThrowFields::IDENTIFIER,
    ThrowFields::MESSAGE,
    ThrowFields::INNER,
    ThrowFields::STACK_TRACE,
];

impl ThrowRecord {
    /// Rendered text of each requested field that has a value
    pub fn render_parts(&self, fields: ThrowFields) -> Vec<(ThrowFields, String)> {
        ORDER
            .iter()
            .filter(|field| fields.contains(**field))
            .filter_map(|field| self.field_text(*field).map(|text| (*field, text)))
            .collect()
    }

    /// Requested fields joined with ` | `
    pub fn render(&self, fields: ThrowFields) -> String {
        self.render_parts(fields)
            .into_iter()
            .map(|(_, text)| text)
            .collect::<Vec<_>>()
            .join(FIELD_SEPARATOR)
    }

    fn field_text(&self, field: ThrowFields) -> Option<String> {
        if field == ThrowFields::MODE {
            Some(self.mode().to_string())
        } else if field == ThrowFields::KIND {
            Some(self.kind().to_string())
        } else if field == ThrowFields::IDENTIFIER {
            Some(self.identifier().to_string())
        } else if field == ThrowFields::MESSAGE {
            Some(self.message().to_string())
        } else if field == ThrowFields::INNER {
            self.inner().map(str::to_string)
        } else if field == ThrowFields::STACK_TRACE {
            let mut trace = format!("at {}", self.caller().location());
            if let Some(backtrace) = self.backtrace() {
                trace.push('\n');
                trace.push_str(backtrace);
            }
            Some(trace)
        } else {
            None
        }
    }
}

impl fmt::Display for ThrowRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(ThrowFields::BASIC))
    }
}
