//! Typed domain separators for canonical hashing.
//!
//! Every hash computation selects a domain via [`HashDomain`], so a search
//! graph and a report artifact with identical bytes still hash differently.

/// Declares `HashDomain` enum, `as_bytes()`, `ALL`, and `Display` from one list.
macro_rules! define_hash_domains {
    (
        $(
            $(#[$meta:meta])*
            $variant:ident => $bytes:expr
        ),+ $(,)?
    ) => {
        /// Typed domain separator for [`super::hash::canonical_hash`].
        ///
        /// Every variant maps to a unique, null-terminated byte string used as
        /// a SHA-256 prefix.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum HashDomain {
            $(
                $(#[$meta])*
                $variant,
            )+
        }

        impl HashDomain {
            /// The raw domain-separator bytes (null-terminated).
            #[must_use]
            pub const fn as_bytes(&self) -> &'static [u8] {
                match self {
                    $( Self::$variant => $bytes, )+
                }
            }

            /// All domain variants in declaration order.
            pub const ALL: &[HashDomain] = &[
                $( Self::$variant, )+
            ];
        }

        impl core::fmt::Display for HashDomain {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                match self {
                    $( Self::$variant => write!(f, stringify!($variant)), )+
                }
            }
        }
    };
}

define_hash_domains! {
    // -----------------------------------------------------------------------
    // Search
    // -----------------------------------------------------------------------

    /// Search graph (expansion audit log) hashing.
    SearchGraph => b"WAYMARK::SEARCH_GRAPH::V1\0",

    /// Search policy snapshot hashing.
    SearchPolicy => b"WAYMARK::SEARCH_POLICY::V1\0",

    // -----------------------------------------------------------------------
    // Harness
    // -----------------------------------------------------------------------

    /// Report artifact content hashing.
    ReportArtifact => b"WAYMARK::REPORT_ARTIFACT::V1\0",

    /// Report digest (normative projection).
    ReportDigest => b"WAYMARK::REPORT_DIGEST::V1\0",

    // -----------------------------------------------------------------------
    // Benchmarks
    // -----------------------------------------------------------------------

    /// Benchmark input hashing.
    BenchInput => b"WAYMARK::BENCH_INPUT::V1\0",
}
