// src/noyau/constantes.rs
//
// Constantes prédéfinies (pi, tau, phi, e, true, false).
// Calculées une seule fois, en rationnels exacts tronqués à CHIFFRES décimales :
// - π   : Machin, π = 16·atan(1/5) − 4·atan(1/239)
// - e   : série Σ 1/k!
// - φ   : (1 + √5)/2, √ par Newton entier
// - τ   : 2π

use std::sync::OnceLock;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;

use super::rationnel::{faux, int_sqrt_floor, vrai};

/// Précision des constantes (décimales).
const CHIFFRES: usize = 60;

/// Décimales de marge pour amortir les erreurs de troncature des séries.
const EXTRA: usize = 10;

fn pow10(n: usize) -> BigInt {
    BigInt::from(10u32).pow(n as u32)
}

/// ⌊atan(1/q) · echelle⌋ (à quelques unités près) par la série de Gregory,
/// termes alternés echelle / ((2k+1)·q^(2k+1)) jusqu’au premier terme nul.
fn arctan_inverse(q: u32, echelle: &BigInt) -> BigInt {
    let q2 = BigInt::from(q) * q;
    let mut puissance = BigInt::from(q);
    let mut total = BigInt::zero();
    let mut impair = 1u32;

    loop {
        let terme = echelle / (&puissance * impair);
        if terme.is_zero() {
            return total;
        }
        if impair % 4 == 1 {
            total += terme;
        } else {
            total -= terme;
        }
        puissance *= &q2;
        impair += 2;
    }
}

fn pi_scaled(digits: usize) -> BigInt {
    let scale = pow10(digits + EXTRA);
    let machin = arctan_inverse(5, &scale) * 16u32 - arctan_inverse(239, &scale) * 4u32;
    machin / pow10(EXTRA)
}

fn e_scaled(digits: usize) -> BigInt {
    let scale = pow10(digits + EXTRA);
    let mut term = scale.clone(); // 1/0!
    let mut sum = BigInt::zero();
    let mut k: u32 = 1;
    while !term.is_zero() {
        sum += &term;
        term /= k;
        k += 1;
    }
    sum / pow10(EXTRA)
}

fn phi_scaled(digits: usize) -> BigInt {
    // √5 · 10^digits = ⌊√(5 · 10^(2·digits))⌋
    let sqrt5 = int_sqrt_floor(&(BigInt::from(5) * pow10(2 * digits)));
    (pow10(digits) + sqrt5) / 2
}

fn depuis_scaled(scaled: BigInt) -> BigRational {
    BigRational::new(scaled, pow10(CHIFFRES))
}

static CONSTANTES: OnceLock<Vec<(&'static str, BigRational)>> = OnceLock::new();

/// Liste (nom, valeur) des constantes, dans l’ordre d’amorçage.
pub fn constantes() -> &'static [(&'static str, BigRational)] {
    CONSTANTES.get_or_init(|| {
        let pi = depuis_scaled(pi_scaled(CHIFFRES));
        let tau = &pi * BigRational::from_integer(BigInt::from(2));
        vec![
            ("pi", pi),
            ("tau", tau),
            ("phi", depuis_scaled(phi_scaled(CHIFFRES))),
            ("e", depuis_scaled(e_scaled(CHIFFRES))),
            ("true", vrai()),
            ("false", faux()),
        ]
    })
}
