//! Compiler identifier registry.
//!
//! A compiler identifier names the toolchain a training executable was built with. The compiler
//! test builds live under `bamboo/compiler_tests/builds/<cluster>_<toolchain>_rel`, so each entry
//! also records its toolchain directory fragment.

use crate::vocab::registry::ItemInfo;

/// Stable identifier for supported compiler configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CompilerId {
    Clang6,
    Gcc7,
    Intel19,
}

/// Registry key used by the parameterized case for an explicitly supplied executable.
///
/// It is not a compiler: the `--exe` case builds a one-entry registry under this key.
pub const EXPLICIT_EXE: &str = "exe";

/// Metadata entry for a compiler.
#[derive(Debug, Clone, Copy)]
pub struct CompilerInfo {
    pub item: ItemInfo<CompilerId>,
    /// Toolchain fragment of the build directory name (e.g. `gcc-7.1.0`).
    pub toolchain: &'static str,
}

/// Registry of supported compilers, in `CompilerId` declaration order.
pub const COMPILERS: &[CompilerInfo] = &[
    info(CompilerId::Clang6, "clang6", "clang-6.0.0", "Clang 6 release build."),
    info(CompilerId::Gcc7, "gcc7", "gcc-7.1.0", "GCC 7 release build."),
    info(CompilerId::Intel19, "intel19", "intel-19.0.0", "Intel 19 release build."),
];

/// Resolve a compiler name to its stable id.
pub fn from_str(name: &str) -> Option<CompilerId> {
    COMPILERS.iter().find(|c| c.item.matches(name)).map(|c| c.item.id)
}

/// Return the canonical spelling for a compiler.
pub fn as_str(id: CompilerId) -> &'static str {
    info_for(id).item.canonical
}

/// Return the toolchain directory fragment for a compiler.
pub fn toolchain(id: CompilerId) -> &'static str {
    info_for(id).toolchain
}

/// Return the metadata entry for a compiler.
pub fn info_for(id: CompilerId) -> &'static CompilerInfo {
    &COMPILERS[id as usize]
}

const fn info(
    id: CompilerId,
    canonical: &'static str,
    toolchain: &'static str,
    description: &'static str,
) -> CompilerInfo {
    CompilerInfo {
        item: ItemInfo {
            id,
            canonical,
            aliases: &[],
            description,
        },
        toolchain,
    }
}
