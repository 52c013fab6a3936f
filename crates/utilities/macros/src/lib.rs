//! Utility macros for recording metrics.
//!
//! Every macro expands to a statement gated on the `metrics` feature of the *calling* crate, so
//! crates can record metrics unconditionally and only pull in the `metrics` dependency when the
//! feature is enabled.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

/// Increments a counter or gauge by one, with optional labels.
#[macro_export]
macro_rules! inc {
    ($instrument:ident, $metric:expr $(, $key:expr => $value:expr)* $(,)?) => {
        #[cfg(feature = "metrics")]
        metrics::$instrument!($metric $(, $key => $value)*).increment(1);
    };
}

/// Increments a counter or gauge by `amount`, with optional labels.
#[macro_export]
macro_rules! add {
    ($instrument:ident, $metric:expr, $amount:expr $(, $key:expr => $value:expr)* $(,)?) => {
        #[cfg(feature = "metrics")]
        metrics::$instrument!($metric $(, $key => $value)*).increment($amount);
    };
}
