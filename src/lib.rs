//! # paramsat - Compiling Parametrized Constraints to CNF
//!
//! `paramsat` compiles a constraint language of boolean formulas, bounded integer arithmetic
//! and parametrized (array-indexed) variables with quantifiers into a set of clauses that any
//! SAT solver can consume.
//!
//! The crate consists of three layers that depend on each other:
//!
//! - [`params`]: closed-form integer expressions and constraints over named parameters,
//!   ordered parameter lists and the [`params::ParamTree`] mapping parameter assignments to
//!   declared objects.
//! - [`encodings`]: the order ([`encodings::range::RangeInteger`]) and two's-complement
//!   ([`encodings::binary::BinaryInteger`]) encodings of bounded integers together with their
//!   comparison and well-definedness clause generators.
//! - [`formula`]: the boolean formula tree with its Tseitin clause generation, using the
//!   [`quantified`] integer layer to instantiate integer comparisons.
//!
//! Clauses are always written to a [`instances::CollectClauses`] sink and variables are
//! always obtained from a [`instances::ManageVars`] registry, both of which are owned by the
//! caller of the compilation.
//!
//! ## Features
//!
//! | Feature name | Description |
//! | --- | --- |
//! | `fxhash` | Use the faster firefox hash function from `rustc-hash` in `paramsat`. |
//! | `serde` | Add implementations for [`serde::Serialize`] and [`serde::Deserialize`] for many library types. |
//!
//! ## Minimum Supported Rust Version (MSRV)
//!
//! Currently, the MSRV is 1.76.0.

use thiserror::Error;

pub mod encodings;
pub mod formula;
pub mod instances;
pub mod params;
pub mod quantified;
pub mod types;

/// Errors raised while building or compiling a model
///
/// None of these errors is recoverable: they indicate that the caller-supplied model is
/// malformed. When compilation fails, the clauses collected so far must be discarded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Clauses or an instantiation were requested for a term that still has free parameters
    #[error("cannot {operation} `{term}`: the term still has free parameters")]
    NotClosed {
        /// The canonical string of the offending term
        term: String,
        /// The attempted operation
        operation: &'static str,
    },
    /// A parameter was evaluated without being bound
    #[error("parameter `{name}` is not bound when evaluating `{term}`")]
    UnboundParameter {
        /// The unbound parameter
        name: String,
        /// The canonical string of the evaluated term
        term: String,
    },
    /// A parameter refers to a parameter that is declared after it
    #[error("parameter `{parameter}` refers to `{reference}` which is not declared before it")]
    ForwardReference {
        /// The parameter whose bounds or restriction contain the reference
        parameter: String,
        /// The referenced parameter
        reference: String,
    },
    /// A parameter name occurs twice in a parameter list
    #[error("parameter `{0}` is declared twice")]
    DuplicateParameter(String),
    /// A variable name is declared twice
    #[error("variable `{0}` is already declared")]
    Redeclaration(String),
    /// A parametrized variable is indexed with the wrong number of arguments
    #[error("`{name}` expects {expected} indices but {found} were given")]
    Arity {
        /// The name of the parametrized variable
        name: String,
        /// The number of declared parameters
        expected: usize,
        /// The number of given indices
        found: usize,
    },
    /// A parametrized variable is indexed outside of its declared domain
    #[error("`{name}[{index}]` lies outside of the declared domain")]
    OutsideDomain {
        /// The name of the parametrized variable
        name: String,
        /// The rendered index values
        index: String,
    },
    /// Two integers with different encodings are combined
    #[error("cannot combine `{lhs}` and `{rhs}`: they use different integer encodings")]
    IncompatibleEncodings {
        /// The canonical string of the left operand
        lhs: String,
        /// The canonical string of the right operand
        rhs: String,
    },
    /// A parameter expression divides by zero
    #[error("division by zero when evaluating `{term}`")]
    DivisionByZero {
        /// The canonical string of the evaluated term
        term: String,
    },
    /// An integer variable is declared with an empty range
    #[error("integer `{name}` has empty range [{min},{max}]")]
    EmptyRange {
        /// The name of the integer
        name: String,
        /// The lower bound
        min: i64,
        /// The upper bound
        max: i64,
    },
}
