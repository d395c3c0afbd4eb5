//! Tests scientifiques (campagne) : invariants + robustesse + limites contrôlées.
//!
//! But : trouver les limites sans faire chauffer la machine.
//! - budget temps global
//! - tailles bornées (profondeur, longueur, exposants)
//!
//! Notes importantes :
//! - Pi, e, divisions et séries sont arrondis à 32 décimales : les identités
//!   (périodicité, symétries, x·x = sqrt(x)²) se vérifient après `round(…, 25)`.
//! - Les additions / multiplications restent exactes : un zéro “rationnel” doit sortir “0” tel quel.

use std::time::{Duration, Instant};

use super::erreur::GenreErreur;
use super::eval::eval_expression;
use super::verif::PROFONDEUR_MAX;

fn eval_ok(expr: &str) -> String {
    eval_expression(expr, 32).unwrap_or_else(|e| panic!("expr={expr:?} err={e}"))
}

fn assert_egal(expr: &str, attendu: &str) {
    assert_eq!(eval_ok(expr), attendu, "expr={expr:?}");
}

fn assert_meme_valeur(a: &str, b: &str) {
    assert_eq!(eval_ok(a), eval_ok(b), "{a:?} vs {b:?}");
}

fn assert_erreur(expr: &str, genre: GenreErreur, extrait: &str) {
    match eval_expression(expr, 32) {
        Ok(v) => panic!("expr={expr:?} : erreur attendue, obtenu {v:?}"),
        Err(e) => {
            assert_eq!(e.genre, genre, "expr={expr:?} err={e}");
            assert!(e.message.contains(extrait), "expr={expr:?} err={e}");
        }
    }
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Invariants trig ------------------------ */

#[test]
fn sci_identites_symetrie() {
    // sin(-x) = -sin(x)
    assert_eq!(eval_ok("sin(-1)"), format!("-{}", eval_ok("sin(1)")));

    // cos(-x) = cos(x)
    assert_meme_valeur("cos(-2.5)", "cos(2.5)");

    // tan(-x) = -tan(x)
    assert_eq!(eval_ok("tan(-0.5)"), format!("-{}", eval_ok("tan(0.5)")));
}

#[test]
fn sci_periodicite_angles() {
    // sin(x + 2π) = sin(x)
    assert_meme_valeur("round(sin(1 + 2*Pi), 25)", "round(sin(1), 25)");

    // cos(x - 4π) = cos(x)
    assert_meme_valeur("round(cos(0.25 - 4*Pi), 25)", "round(cos(0.25), 25)");

    // sin² + cos² = 1
    assert_egal("round(sin(3)^2 + cos(3)^2, 25)", "1");
}

#[test]
fn sci_angles_en_degres() {
    assert_egal("round(sin(rad(30)), 25)", "0.5");
    assert_egal("round(cos(rad(60)), 25)", "0.5");
    assert_egal("round(tan(rad(45)), 25)", "1");
}

/* ------------------------ Cohérence algébrique (zéro) ------------------------ */

#[test]
fn sci_zero_algebrique() {
    // (1/2 + 1/3) - 5/6 = 0
    assert_egal("(1/2 + 1/3) - 5/6", "0");

    // (2/3 * 3/4) - 1/2 = 0
    assert_egal("(2/3 * 3/4) - 1/2", "0");

    // sqrt(2)*sqrt(2) - 2 = 0 (à l’arrondi près)
    assert_egal("round(sqrt(2)*sqrt(2) - 2, 25)", "0");

    // 0.1 + 0.2 : décimal exact, pas de binaire flottant
    assert_egal("0.1 + 0.2 - 0.3", "0");
}

#[test]
fn sci_racines_et_puissances() {
    assert_egal("root(2, 2) - sqrt(2)", "0");
    assert_egal("round((2 @ 3)^3, 25)", "2");
    assert_egal("4 @ -2", "0.5");
    assert_egal("round(2^0.5 - sqrt(2), 25)", "0");
    assert_egal("round(e^1 - e, 25)", "0");
}

/* ------------------------ Cas limites numériques ------------------------ */

#[test]
fn sci_cas_limites() {
    assert_erreur("1/0", GenreErreur::Arithmetique, "division par zéro");
    assert_erreur("1//0", GenreErreur::Arithmetique, "division par zéro");
    assert_erreur("1%0", GenreErreur::Arithmetique, "modulo par zéro");
    assert_erreur("0^0", GenreErreur::Arithmetique, "0 ^ 0");
    assert_erreur("0 @ -2", GenreErreur::Arithmetique, "division par zéro");
    assert_erreur("-8 @ 3", GenreErreur::Arithmetique, "racine d’un nombre négatif");
    assert_erreur("8 @ 0", GenreErreur::Arithmetique, "indice de racine nul");
    assert_erreur("8 @ 1.5", GenreErreur::Arithmetique, "entier");
    assert_erreur("round(1, 0.5)", GenreErreur::Arithmetique, "entier");
    assert_erreur("2^100001", GenreErreur::Arithmetique, "exposant trop grand");
}

#[test]
fn sci_separateurs_de_chiffres() {
    assert_egal("1_000 + 0.000_1", "1000.0001");
    assert_egal("123_123_31.1_1_23_123", "12312331.1123123");
    assert_erreur("1__123", GenreErreur::Resolution, "nombre invalide");
}

/* ------------------------ Stress contrôlé (sans brûler) ------------------------ */

#[test]
fn sci_stress_profondeur_sqrt_safe() {
    let t0 = Instant::now();
    let max = Duration::from_secs(10);

    // sqrt(4) -> 2 ; (2)^2 -> 4 ; etc. On alterne pour rester sur des carrés parfaits.
    let mut expr = "4".to_string();
    for k in 0..60 {
        expr = if k % 2 == 0 {
            format!("sqrt({expr})")
        } else {
            format!("({expr})^2")
        };
    }

    assert_egal(&expr, "4");
    budget(t0, max);
}

#[test]
fn sci_stress_taille_somme_safe() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    let mut expr = String::new();
    for k in 0..800 {
        if k > 0 {
            expr.push_str(" + ");
        }
        expr.push_str("1/2");
    }

    // 800*(1/2)=400
    assert_egal(&expr, "400");
    budget(t0, max);
}

#[test]
fn sci_stress_profondeur_parentheses() {
    let ok = format!("{}1{}", "(".repeat(PROFONDEUR_MAX), ")".repeat(PROFONDEUR_MAX));
    assert_egal(&ok, "1");

    let trop = format!(
        "{}1{}",
        "(".repeat(PROFONDEUR_MAX + 1),
        ")".repeat(PROFONDEUR_MAX + 1)
    );
    assert_erreur(&trop, GenreErreur::Structurelle, "trop imbriquée");

    // imbrication via appels : même borne
    let appels = format!("{}1{}", "abs(".repeat(PROFONDEUR_MAX + 1), ")".repeat(PROFONDEUR_MAX + 1));
    assert_erreur(&appels, GenreErreur::Structurelle, "trop imbriquée");
}

#[test]
fn sci_stress_bigint_safe() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    // gros numérateur contrôlé (100 chiffres)
    let big = "9".repeat(100);
    let v = eval_ok(&format!("{big}/7 + 1/7"));
    assert!(v.starts_with("142857142857"), "{v}");

    // grand exposant autorisé : 2^100000 a 30103 chiffres
    let v = eval_ok("2^100000");
    assert_eq!(v.len(), 30103);
    budget(t0, max);
}

/* ------------------------ Grands indices / exposants (budget) ------------------------ */

#[test]
fn sci_racines_grands_indices() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    assert!(eval_ok("root(2, 20)").starts_with("1.0352649238"));
    assert!(eval_ok("2 @ 1000").starts_with("1.000693387462"));
    assert!(eval_ok("root(10^50, 7)").starts_with("13894954.94"));
    assert_egal("round(root(2, 50)^50, 20)", "2");
    assert_egal("round(root(7, 100_000)^100_000, 20)", "7");
    budget(t0, max);
}

#[test]
fn sci_grands_exposants_arrondis() {
    let t0 = Instant::now();
    let max = Duration::from_secs(10);

    // (1/3)^100000 < 10^-47000 : zéro à 32 décimales
    assert_egal("(1/3)^100000", "0");
    assert_egal("(1/3)^-3", "27");

    // e^100000 ≈ 10^43429.448 : 43430 chiffres avant la virgule
    let v = eval_ok("e^100000");
    let entiers = v.split('.').next().unwrap_or_default();
    assert_eq!(entiers.len(), 43430);
    assert!(v.starts_with("2806"), "{}", &v[..20]);
    budget(t0, max);
}

#[test]
fn sci_angles_geants_bornes() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    assert_erreur("sin(10^30000)", GenreErreur::Arithmetique, "angle trop grand");
    assert_erreur("tan(-10^2000)", GenreErreur::Arithmetique, "angle trop grand");
    // sous la borne : π pris à ~540 chiffres
    assert!(eval_ok("cos(10^500)").starts_with("-0.950401098615743512551775127"));
    budget(t0, max);
}
