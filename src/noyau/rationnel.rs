// src/noyau/rationnel.rs
//
// Couche numérique : BigRational (num-rational) + opérations dérivées.
// - arithmétique exacte (division / modulo vérifiés)
// - coercition entière pour le bit à bit (dénominateur 1 exigé)
// - aller-retour flottant pour les fonctions transcendantes
//
// Convention booléenne : vrai = 1/1, faux = 0/1.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::erreur::ErreurNumerique;

pub type Resultat = Result<BigRational, ErreurNumerique>;

pub fn vrai() -> BigRational {
    BigRational::one()
}

pub fn faux() -> BigRational {
    BigRational::zero()
}

pub fn depuis_bool(b: bool) -> BigRational {
    if b {
        vrai()
    } else {
        faux()
    }
}

fn pow10(n: u32) -> BigInt {
    BigInt::from(10).pow(n)
}

/* ------------------------ Littéraux ------------------------ */

/// Plus grand exposant accepté dans un littéral décimal (`1e4096`, `1e-4096`).
pub const EXPOSANT_LITTERAL_MAX: u32 = 4096;

/// Littéral décimal exact : "12", "3.25", ".5", "5.", "1e3", "2.5E-2".
/// `None` si l’exposant dépasse [`EXPOSANT_LITTERAL_MAX`] en valeur absolue.
pub fn parse_decimal(lexeme: &str) -> Option<BigRational> {
    let (mantisse, exposant) = match lexeme.find(['e', 'E']) {
        Some(i) => (&lexeme[..i], lexeme[i + 1..].parse::<i64>().ok()?),
        None => (lexeme, 0),
    };
    if exposant.unsigned_abs() > u64::from(EXPOSANT_LITTERAL_MAX) {
        return None;
    }

    let (ent, frac) = mantisse.split_once('.').unwrap_or((mantisse, ""));
    let chiffres = format!("{ent}{frac}");
    if chiffres.is_empty() {
        return None;
    }
    let n = BigInt::parse_bytes(chiffres.as_bytes(), 10)?;

    // valeur = n × 10^(exposant − |frac|)
    let decalage = exposant.checked_sub(frac.len() as i64)?;
    let echelle = pow10(u32::try_from(decalage.unsigned_abs()).ok()?);
    if decalage >= 0 {
        Some(BigRational::from_integer(n * echelle))
    } else {
        Some(BigRational::new(n, echelle))
    }
}

/// Littéral à base : "0x1f", "0b101", "0o17" (préfixe de deux caractères retiré).
pub fn parse_radix(lexeme: &str, radix: u32) -> Option<BigRational> {
    let chiffres = lexeme.get(2..)?;
    let n = BigInt::parse_bytes(chiffres.as_bytes(), radix)?;
    Some(BigRational::from_integer(n))
}

/* ------------------------ Arithmétique vérifiée ------------------------ */

pub fn diviser(a: &BigRational, b: &BigRational) -> Resultat {
    if b.is_zero() {
        return Err(ErreurNumerique::DivisionParZero);
    }
    Ok(a / b)
}

/// Modulo mathématique : a − floor(a/b)·b, du signe du diviseur.
pub fn modulo(a: &BigRational, b: &BigRational) -> Resultat {
    if b.is_zero() {
        return Err(ErreurNumerique::DivisionParZero);
    }
    let q = (a / b).floor();
    Ok(a - q * b)
}

/// Puissance.
/// - base et exposant entiers : exacte (entier^entier, inverse si exposant < 0)
/// - sinon : aller-retour flottant, même pour `(1/3) ** 2`
pub fn puissance(base: &BigRational, exp: &BigRational) -> Resultat {
    if !(base.is_integer() && exp.is_integer()) {
        let f = vers_f64(base).powf(vers_f64(exp));
        return depuis_f64(f);
    }

    let e = exp.to_integer();

    // bases triviales : pas de limite sur l’exposant
    if base.is_zero() {
        return if e.is_negative() {
            Err(ErreurNumerique::DivisionParZero)
        } else if e.is_zero() {
            Ok(BigRational::one())
        } else {
            Ok(BigRational::zero())
        };
    }
    if base.is_one() {
        return Ok(BigRational::one());
    }
    if *base == -BigRational::one() {
        let impair = (&e % 2u32) != BigInt::zero();
        return Ok(if impair {
            -BigRational::one()
        } else {
            BigRational::one()
        });
    }

    let n = e.abs().to_u32().ok_or(ErreurNumerique::ExposantTropGrand)?;
    let r = rational_pow_int(base.clone(), n);
    if e.is_negative() {
        Ok(r.recip())
    } else {
        Ok(r)
    }
}

/// Exponentiation rapide (carré-multiplie).
fn rational_pow_int(base: BigRational, exp: u32) -> BigRational {
    let mut e = exp;
    let mut acc = BigRational::one();
    let mut b = base;

    while e > 0 {
        if (e & 1) == 1 {
            acc *= b.clone();
        }
        e >>= 1;
        if e > 0 {
            b = &b * &b;
        }
    }
    acc
}

pub fn comparer(a: &BigRational, b: &BigRational) -> std::cmp::Ordering {
    a.cmp(b)
}

/* ------------------------ Entiers ------------------------ */

/// Coercition entière stricte (bit à bit) : dénominateur 1 exigé.
pub fn vers_entier(r: &BigRational) -> Result<BigInt, ErreurNumerique> {
    if r.is_integer() {
        Ok(r.to_integer())
    } else {
        Err(ErreurNumerique::NonEntier)
    }
}

/// Partie entière (plancher), pour fact / gcd / affichage en base.
pub fn partie_entiere(r: &BigRational) -> BigInt {
    r.floor().to_integer()
}

pub fn plancher(r: &BigRational) -> BigRational {
    r.floor()
}

pub fn plafond(r: &BigRational) -> BigRational {
    r.ceil()
}

/// PGCD (Euclide) des parties entières, toujours ≥ 0.
pub fn pgcd(a: &BigRational, b: &BigRational) -> BigRational {
    let mut x = partie_entiere(a).abs();
    let mut y = partie_entiere(b).abs();
    while !y.is_zero() {
        let r = &x % &y;
        x = y;
        y = r;
    }
    BigRational::from_integer(x)
}

/// n! = produit sur [1, floor(n)] (1 si floor(n) < 2).
pub fn factorielle(n: &BigRational) -> Resultat {
    let borne = partie_entiere(n);
    if borne < BigInt::from(2) {
        return Ok(BigRational::one());
    }
    let borne = borne.to_u32().ok_or(ErreurNumerique::ArgumentTropGrand)?;

    let mut acc = BigInt::one();
    for k in 2..=borne {
        acc *= k;
    }
    Ok(BigRational::from_integer(acc))
}

/* ------------------------ Bit à bit ------------------------ */

pub fn et(a: &BigRational, b: &BigRational) -> Resultat {
    Ok(BigRational::from_integer(vers_entier(a)? & vers_entier(b)?))
}

pub fn ou(a: &BigRational, b: &BigRational) -> Resultat {
    Ok(BigRational::from_integer(vers_entier(a)? | vers_entier(b)?))
}

pub fn ou_exclusif(a: &BigRational, b: &BigRational) -> Resultat {
    Ok(BigRational::from_integer(vers_entier(a)? ^ vers_entier(b)?))
}

pub fn non(a: &BigRational) -> Resultat {
    Ok(BigRational::from_integer(!vers_entier(a)?))
}

/// Compte de décalage : magnitude non signée de l’opérande.
fn compte_decalage(b: &BigRational) -> Result<usize, ErreurNumerique> {
    let n = vers_entier(b)?.abs();
    n.to_u32()
        .map(|c| c as usize)
        .ok_or(ErreurNumerique::DecalageTropGrand)
}

pub fn decalage_gauche(a: &BigRational, b: &BigRational) -> Resultat {
    let x = vers_entier(a)?;
    let n = compte_decalage(b)?;
    Ok(BigRational::from_integer(x << n))
}

pub fn decalage_droite(a: &BigRational, b: &BigRational) -> Resultat {
    let x = vers_entier(a)?;
    let n = compte_decalage(b)?;
    Ok(BigRational::from_integer(x >> n))
}

/* ------------------------ Flottants ------------------------ */

pub fn vers_f64(r: &BigRational) -> f64 {
    r.to_f64().unwrap_or(f64::NAN)
}

/// Ré-exactifie un flottant (valeur binaire exacte du f64) ; NaN / ±∞ refusés.
pub fn depuis_f64(f: f64) -> Resultat {
    if !f.is_finite() {
        return Err(ErreurNumerique::NonFini);
    }
    BigRational::from_float(f).ok_or(ErreurNumerique::NonFini)
}

/// r > 0 écrit m × 2^k, m entre 1/2 et 2 (entre 1 et 4 si `pair`, k étant alors pair).
fn mantisse_binaire(r: &BigRational, pair: bool) -> (BigRational, i64) {
    let mut k = r.numer().bits() as i64 - r.denom().bits() as i64;
    if pair {
        k -= k.rem_euclid(2);
    }
    let p = k.unsigned_abs();
    let m = if k >= 0 {
        BigRational::new(r.numer().clone(), r.denom() << p)
    } else {
        BigRational::new(r.numer() << p, r.denom().clone())
    };
    (m, k)
}

/// Logarithme en flottant (`f64::ln`, `f64::log10`...) d’un rationnel quelconque.
/// Hors de la plage f64, on passe par log(m) + k·log(2).
pub fn logarithme(r: &BigRational, log: fn(f64) -> f64) -> f64 {
    let f = vers_f64(r);
    if f.is_normal() || !r.is_positive() {
        return log(f);
    }
    let (m, k) = mantisse_binaire(r, false);
    log(vers_f64(&m)) + k as f64 * log(2.0)
}

/// √r exacte si r est un carré parfait rationnel, sinon approximation flottante.
/// Hors de la plage f64 : √(m × 2^k) = √m × 2^(k/2).
pub fn racine_carree(r: &BigRational) -> Resultat {
    if let Some(exacte) = rational_sqrt_exact(r) {
        return Ok(exacte);
    }
    let f = vers_f64(r);
    if f.is_normal() || !r.is_positive() {
        return depuis_f64(f.sqrt());
    }
    let (m, k) = mantisse_binaire(r, true);
    let racine_m = depuis_f64(vers_f64(&m).sqrt())?;
    let echelle = BigInt::one() << (k / 2).unsigned_abs();
    if k >= 0 {
        Ok(racine_m * BigRational::from_integer(echelle))
    } else {
        Ok(racine_m / BigRational::from_integer(echelle))
    }
}

fn rational_sqrt_exact(r: &BigRational) -> Option<BigRational> {
    if r.is_negative() {
        return None;
    }
    let sn = int_sqrt_exact(r.numer())?;
    let sd = int_sqrt_exact(r.denom())?;
    Some(BigRational::new(sn, sd))
}

fn int_sqrt_exact(x: &BigInt) -> Option<BigInt> {
    let s = int_sqrt_floor(x);
    if &s * &s == *x {
        Some(s)
    } else {
        None
    }
}

/// ⌊√x⌋ par Newton entier (0 pour x ≤ 0).
pub(crate) fn int_sqrt_floor(x: &BigInt) -> BigInt {
    if !x.is_positive() {
        return BigInt::zero();
    }

    let mut y = BigInt::one() << x.bits().div_ceil(2);
    loop {
        let y_next = (&y + (x / &y)) >> 1;
        if y_next >= y {
            let mut z = y_next;
            while (&z + 1u32) * (&z + 1u32) <= *x {
                z += 1u32;
            }
            while &z * &z > *x {
                z -= 1u32;
            }
            return z;
        }
        y = y_next;
    }
}
