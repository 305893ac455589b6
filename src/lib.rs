//! Calculatrice Q : langage d’expressions arithmétiques sur rationnels exacts.
//!
//! ```
//! use calculatrice_q::{evaluate, Evaluator};
//! use num_rational::BigRational;
//!
//! assert_eq!(evaluate("2 ** 3 ** 2"), Ok(BigRational::from_integer(512.into())));
//!
//! let mut ev = Evaluator::new();
//! ev.run("a = 5").unwrap();
//! assert_eq!(ev.run("a * 2"), Ok(BigRational::from_integer(10.into())));
//! ```

pub mod noyau;

pub use noyau::{
    evaluate, exec_with, format_fraction, formater, lex, CalcError, Demarche, ErreurNumerique,
    Evaluator, ModeSortie, Token, TokenKind,
};
