// src/noyau/format.rs
//
// Rendu texte d’un rationnel.
// - décimal : entier si dénominateur 1, sinon virgule fixe arrondie (demi loin de zéro)
// - hex / binaire / octal : partie entière (plancher), préfixe 0x / 0b / 0o

use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed};

use super::rationnel::partie_entiere;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModeSortie {
    #[default]
    Decimal,
    Hex,
    Binaire,
    Octal,
}

impl ModeSortie {
    pub const TOUS: [ModeSortie; 4] = [
        ModeSortie::Decimal,
        ModeSortie::Hex,
        ModeSortie::Binaire,
        ModeSortie::Octal,
    ];

    pub fn nom(self) -> &'static str {
        match self {
            ModeSortie::Decimal => "decimal",
            ModeSortie::Hex => "hex",
            ModeSortie::Binaire => "binary",
            ModeSortie::Octal => "octal",
        }
    }
}

impl fmt::Display for ModeSortie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.nom())
    }
}

impl FromStr for ModeSortie {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModeSortie::TOUS
            .into_iter()
            .find(|m| m.nom().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("mode de sortie invalide ‘{s}’ (decimal, hex, binary, octal)"))
    }
}

/* ------------------------ Décimal ------------------------ */

fn pow10(n: usize) -> BigInt {
    BigInt::from(10).pow(n as u32)
}

/// Convertit un entier “scalé” (×10^digits, ≥ 0) en texte décimal.
fn scaled_to_decimal(scaled: &BigInt, digits: usize) -> String {
    if digits == 0 {
        return scaled.to_string();
    }

    let scale = pow10(digits);
    let int_part = scaled / &scale;
    let frac_part = scaled % &scale;

    format!("{int_part}.{:0>digits$}", frac_part.to_str_radix(10))
}

/// r en virgule fixe, `digits` décimales, arrondi demi loin de zéro.
fn format_fixe(r: &BigRational, digits: usize) -> String {
    let num = r.numer().abs() * pow10(digits);
    let den = r.denom();

    let mut q = &num / den;
    let reste = &num % den;
    if reste * 2u32 >= *den {
        q += 1u32;
    }

    let texte = scaled_to_decimal(&q, digits);
    // -0.000 s’affiche 0.000
    if r.is_negative() && q.is_positive() {
        format!("-{texte}")
    } else {
        texte
    }
}

/* ------------------------ Bases ------------------------ */

fn format_base(n: &BigInt, mode: ModeSortie) -> String {
    let signe = if n.is_negative() { "-" } else { "" };
    let m = n.abs();
    match mode {
        ModeSortie::Hex => format!("{signe}{m:#x}"),
        ModeSortie::Binaire => format!("{signe}{m:#b}"),
        ModeSortie::Octal => format!("{signe}{m:#o}"),
        ModeSortie::Decimal => n.to_string(),
    }
}

/* ------------------------ API ------------------------ */

/// Rendu d’un résultat selon le mode de sortie et la précision décimale.
pub fn formater(r: &BigRational, mode: ModeSortie, digits: usize) -> String {
    match mode {
        ModeSortie::Decimal if r.denom().is_one() => r.numer().to_string(),
        ModeSortie::Decimal => format_fixe(r, digits),
        _ => format_base(&partie_entiere(r), mode),
    }
}

/// Forme exacte p/q (p seul si q = 1).
pub fn format_fraction(r: &BigRational) -> String {
    if r.denom().is_one() {
        format!("{}", r.numer())
    } else {
        format!("{}/{}", r.numer(), r.denom())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn r(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn entiers_sans_decimales() {
        assert_eq!(formater(&r(42, 1), ModeSortie::Decimal, 6), "42");
        assert_eq!(formater(&r(-7, 1), ModeSortie::Decimal, 6), "-7");
    }

    #[test]
    fn virgule_fixe_arrondie() {
        assert_eq!(formater(&r(1, 2), ModeSortie::Decimal, 6), "0.500000");
        assert_eq!(formater(&r(2, 3), ModeSortie::Decimal, 2), "0.67");
        assert_eq!(formater(&r(-2, 3), ModeSortie::Decimal, 2), "-0.67");
        assert_eq!(formater(&r(1, 8), ModeSortie::Decimal, 2), "0.13");
        assert_eq!(formater(&r(-1, 8), ModeSortie::Decimal, 2), "-0.13");
        assert_eq!(formater(&r(5, 2), ModeSortie::Decimal, 0), "3");
        assert_eq!(formater(&r(-1, 1000), ModeSortie::Decimal, 2), "0.00");
    }

    #[test]
    fn bases_prefixees() {
        assert_eq!(formater(&r(255, 1), ModeSortie::Hex, 6), "0xff");
        assert_eq!(formater(&r(5, 1), ModeSortie::Binaire, 6), "0b101");
        assert_eq!(formater(&r(8, 1), ModeSortie::Octal, 6), "0o10");
        assert_eq!(formater(&r(-255, 1), ModeSortie::Hex, 6), "-0xff");
        // plancher : 7/2 -> 3, -7/2 -> -4
        assert_eq!(formater(&r(7, 2), ModeSortie::Binaire, 6), "0b11");
        assert_eq!(formater(&r(-7, 2), ModeSortie::Hex, 6), "-0x4");
    }

    #[test]
    fn fractions() {
        assert_eq!(format_fraction(&r(6, 4)), "3/2");
        assert_eq!(format_fraction(&r(-9, 3)), "-3");
    }

    #[test]
    fn mode_depuis_texte() {
        assert_eq!("hex".parse::<ModeSortie>(), Ok(ModeSortie::Hex));
        assert_eq!("Binary".parse::<ModeSortie>(), Ok(ModeSortie::Binaire));
        assert_eq!("octal".parse::<ModeSortie>(), Ok(ModeSortie::Octal));
        assert_eq!("decimal".parse::<ModeSortie>(), Ok(ModeSortie::Decimal));
        assert!("number".parse::<ModeSortie>().is_err());
    }
}
