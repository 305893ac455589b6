//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler lexeur et évaluateur sans brûler la machine.
//! - proptest (graines reproductibles, réduction des contre-exemples)
//! - profondeur et tailles bornées
//! - budget temps global pour les cas lourds
//! - on accepte certaines erreurs attendues (division par zéro, opérande non entier)
//! - invariant clé : aucune entrée ne fait paniquer le noyau

use std::time::{Duration, Instant};

use num_bigint::BigInt;
use num_rational::BigRational;
use proptest::prelude::*;

use super::erreur::CalcError;
use super::evaluateur::{evaluate, Evaluator};
use super::lexeur::lex;

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Helpers fuzz ------------------------ */

fn is_erreur_attendue(e: &CalcError) -> bool {
    // Liste blanche : erreurs *normales* pour des expressions bien formées
    // à opérandes aléatoires.
    matches!(e, CalcError::Arithmetique { .. } | CalcError::Type { .. })
}

fn entier(n: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(n))
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

fn atome() -> impl Strategy<Value = String> {
    prop_oneof![
        (-50i64..50).prop_map(|n| format!("({n})")),
        (1u32..20, 1u32..9).prop_map(|(a, b)| format!("{a}/{b}")),
        Just("pi".to_string()),
        Just("true".to_string()),
        (0u32..256).prop_map(|n| format!("{n:#x}")),
        (0u32..64).prop_map(|n| format!("{n:#b}")),
    ]
}

fn expression() -> impl Strategy<Value = String> {
    atome().prop_recursive(4, 32, 2, |inner| {
        let ops = prop::sample::select(vec![
            "+", "-", "*", "/", "%", "&", "|", "^", "==", "!=", "<", ">=",
        ]);
        prop_oneof![
            (inner.clone(), ops, inner.clone()).prop_map(|(a, op, b)| format!("({a} {op} {b})")),
            inner.clone().prop_map(|a| format!("-{a}")),
            inner.clone().prop_map(|a| format!("abs({a})")),
            (inner.clone(), inner).prop_map(|(a, b)| format!("max({a}, {b})")),
        ]
    })
}

/* ------------------------ Propriétés ------------------------ */

proptest! {
    #[test]
    fn lexeur_ne_panique_jamais(source in "\\PC{0,40}") {
        let _ = lex(&source);
    }

    #[test]
    fn lexeur_termine_par_eol(source in "[a-z0-9+*/%()., -]{0,30}") {
        if let Ok(tokens) = lex(&source) {
            prop_assert!(tokens.last().is_some_and(|t| t.is(super::jetons::TokenKind::Eol)));
        }
    }

    #[test]
    fn evaluateur_ne_panique_jamais(source in "[a-z0-9+*/%&|^~<>=!(),. -]{0,30}") {
        let _ = evaluate(&source);
    }

    #[test]
    fn expressions_bien_formees(expr in expression()) {
        match evaluate(&expr) {
            Ok(_) => {}
            Err(e) => prop_assert!(is_erreur_attendue(&e), "expr={expr:?} err={e}"),
        }
    }

    #[test]
    fn determinisme(expr in expression()) {
        prop_assert_eq!(evaluate(&expr), evaluate(&expr));
    }

    #[test]
    fn arithmetique_entiere_comme_i128(
        a in -1000i64..1000,
        b in -1000i64..1000,
        c in -1000i64..1000,
    ) {
        let attendu = i128::from(a) + i128::from(b) * i128::from(c) - i128::from(a);
        let expr = format!("{a} + {b} * {c} - {a}");
        prop_assert_eq!(evaluate(&expr), Ok(entier(attendu as i64)));
    }

    #[test]
    fn modulo_du_signe_du_diviseur(a in -1000i64..1000, b in 1i64..100) {
        prop_assert_eq!(evaluate(&format!("{a} % {b}")), Ok(entier(a.rem_euclid(b))));
        let neg = evaluate(&format!("{a} % -{b}"));
        prop_assert!(neg.is_ok_and(|r| r <= entier(0) && r > entier(-b)));
    }

    #[test]
    fn bit_a_bit_comme_i64(a in -5000i64..5000, b in -5000i64..5000) {
        prop_assert_eq!(evaluate(&format!("{a} & {b}")), Ok(entier(a & b)));
        prop_assert_eq!(evaluate(&format!("{a} | {b}")), Ok(entier(a | b)));
        prop_assert_eq!(evaluate(&format!("{a} ^ {b}")), Ok(entier(a ^ b)));
        prop_assert_eq!(evaluate(&format!("~{a}")), Ok(entier(!a)));
    }

    #[test]
    fn affectation_puis_lecture(nom in "[a-z_][a-z0-9_]{0,8}", v in -1000i64..1000) {
        let mut ev = Evaluator::new();
        prop_assert_eq!(ev.run(&format!("{nom} = {v}")), Ok(entier(v)));
        prop_assert_eq!(ev.run(&nom), Ok(entier(v)));
    }
}

/* ------------------------ Helper somme balancée anti pile ------------------------ */

fn somme_balancee(terme: &str, n: usize) -> String {
    let mut items: Vec<String> = (0..n).map(|_| terme.to_string()).collect();
    while items.len() > 1 {
        let mut next = Vec::new();
        let mut i = 0;
        while i < items.len() {
            if i + 1 < items.len() {
                next.push(format!("({}+{})", items[i], items[i + 1]));
                i += 2;
            } else {
                next.push(items[i].clone());
                i += 1;
            }
        }
        items = next;
    }
    items.pop().unwrap_or_else(|| "0".to_string())
}

#[test]
fn fuzz_safe_somme_balancee() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    let expr = somme_balancee("1/2", 800);
    let v = evaluate(&expr).unwrap_or_else(|e| panic!("err: {e}"));
    budget(t0, max);

    // 800*(1/2) = 400
    assert_eq!(v, entier(400));
}

#[test]
fn fuzz_safe_parentheses_profondes() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    // pas de récursion : la profondeur ne coûte que de la pile de travail
    let n = 5_000;
    let expr = format!("{}1{}", "(".repeat(n), ")".repeat(n));
    assert_eq!(evaluate(&expr), Ok(entier(1)));

    let expr = format!("{}1", "-".repeat(n));
    assert_eq!(evaluate(&expr), Ok(entier(1)));
    budget(t0, max);
}
