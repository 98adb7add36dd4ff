use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::types::CompilerType;

/// Maps enum cell values to the command-line tokens of one tool.
///
/// `None` means the tool has no token for that value; renderers emit
/// nothing in its place.
pub trait ToolDescriptor {
    fn development_mode_option(&self, value: u8) -> Option<&str>;
    fn warning_level_option(&self, value: u8) -> Option<&str>;
    fn sixty_four_bits_option(&self, value: u8) -> Option<&str>;
    fn strip_option(&self, strip: bool) -> Option<&str>;

    /// Executable name, when the descriptor knows one.
    fn executable(&self) -> Option<&str> {
        None
    }
}

/// Option tokens for an assembler, indexed by enum value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OptionTable {
    pub name: String,
    pub development_mode: Vec<String>,
    pub warning_level: Vec<String>,
    pub sixty_four_bits: Vec<String>,
    pub strip: String,
}

fn lookup(table: &[String], value: u8) -> Option<&str> {
    table.get(value as usize).map(String::as_str)
}

fn strings(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|s| s.to_string()).collect()
}

impl ToolDescriptor for OptionTable {
    fn development_mode_option(&self, value: u8) -> Option<&str> {
        lookup(&self.development_mode, value)
    }

    fn warning_level_option(&self, value: u8) -> Option<&str> {
        lookup(&self.warning_level, value)
    }

    fn sixty_four_bits_option(&self, value: u8) -> Option<&str> {
        lookup(&self.sixty_four_bits, value)
    }

    fn strip_option(&self, strip: bool) -> Option<&str> {
        if strip { Some(&self.strip) } else { Some("") }
    }

    fn executable(&self) -> Option<&str> {
        if self.name.is_empty() {
            None
        } else {
            Some(&self.name)
        }
    }
}

impl OptionTable {
    /// Builtin assembler table for a compiler family.
    pub fn builtin(compiler: CompilerType) -> Self {
        match compiler {
            CompilerType::GCC => Self {
                name: "as".to_string(),
                development_mode: strings(&["", "-g", "-g", "-g", "-g", "", ""]),
                warning_level: strings(&["-W", "", "", "--fatal-warnings"]),
                sixty_four_bits: strings(&["", "--32", "--64"]),
                strip: "-s".to_string(),
            },
            CompilerType::Clang => Self {
                name: "clang".to_string(),
                development_mode: strings(&["", "-g", "-g", "-g", "-g", "", ""]),
                warning_level: strings(&["-w", "", "-Wall", "-Werror"]),
                sixty_four_bits: strings(&["", "-m32", "-m64"]),
                strip: "-s".to_string(),
            },
            CompilerType::MSVC => Self {
                name: "ml".to_string(),
                development_mode: strings(&["", "/Zi", "/Zi", "/Zi", "/Zi", "", ""]),
                warning_level: strings(&["/W0", "/W1", "/W3", "/WX"]),
                sixty_four_bits: strings(&["", "", ""]),
                strip: String::new(),
            },
            CompilerType::ClangCL => Self {
                name: "clang-cl".to_string(),
                development_mode: strings(&["", "/Z7", "/Z7", "/Z7", "/Z7", "", ""]),
                warning_level: strings(&["/W0", "/W1", "/W3", "/WX"]),
                sixty_four_bits: strings(&["", "-m32", "-m64"]),
                strip: String::new(),
            },
        }
    }
}

/// User overrides, one table per compiler family:
///
/// ```toml
/// [tool.GCC]
/// name = "as"
/// warning_level = ["-W", "", "", "--fatal-warnings"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolDatabase {
    #[serde(default)]
    pub tool: BTreeMap<String, OptionTable>,
}

impl ToolDatabase {
    pub fn get(&self, compiler: CompilerType) -> Option<&OptionTable> {
        self.tool.get(compiler.as_str())
    }
}
