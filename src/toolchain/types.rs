use serde::{Deserialize, Serialize};
use std::fmt;

/// Compiler families with a builtin option table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum CompilerType {
    /// GNU Compiler Collection and GNU as
    #[default]
    GCC,
    /// Clang/LLVM integrated assembler
    Clang,
    /// Microsoft Visual C++ (ml/ml64)
    MSVC,
    /// Clang with MSVC compatibility (clang-cl.exe)
    ClangCL,
}

impl CompilerType {
    pub const ALL: [CompilerType; 4] = [
        CompilerType::GCC,
        CompilerType::Clang,
        CompilerType::MSVC,
        CompilerType::ClangCL,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CompilerType::GCC => "GCC",
            CompilerType::Clang => "Clang",
            CompilerType::MSVC => "MSVC",
            CompilerType::ClangCL => "ClangCL",
        }
    }

    /// Case-insensitive lookup, accepting the usual driver names too.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "gcc" | "gnu" | "g++" => Some(CompilerType::GCC),
            "clang" | "clang++" | "llvm" => Some(CompilerType::Clang),
            "msvc" | "cl" => Some(CompilerType::MSVC),
            "clangcl" | "clang-cl" => Some(CompilerType::ClangCL),
            _ => None,
        }
    }

    pub fn uses_msvc_flags(&self) -> bool {
        matches!(self, CompilerType::MSVC | CompilerType::ClangCL)
    }
}

impl fmt::Display for CompilerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
