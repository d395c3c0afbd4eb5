//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée, petits nombres (pas d’exposant géant)
//! - budget temps global
//! - on accepte certaines erreurs attendues (division par zéro, racine négative, etc.)
//! - invariants clés : jamais de panique, emplacement d’erreur dans le texte,
//!   rendu relu = même rendu

use std::time::{Duration, Instant};

use super::erreur::{ErreurExpr, GenreErreur};
use super::eval::Executeur;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
    fn choose<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.pick(items.len() as u32) as usize]
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Helpers fuzz ------------------------ */

fn is_erreur_attendue(e: &ErreurExpr) -> bool {
    // Liste blanche : échecs arithmétiques *normaux* sur des expressions bien formées.
    e.genre == GenreErreur::Arithmetique
        && (e.message.contains("division par zéro")
            || e.message.contains("modulo par zéro")
            || e.message.contains("racine d’un nombre négatif")
            || e.message.contains("valeur imaginaire")
            || e.message.contains("valeur indéfinie")
            || e.message.contains("infini")
            || e.message.contains("tangente indéfinie")
            || e.message.contains("angle trop grand")
            || e.message.contains("indice de racine nul"))
}

fn check_emplacement(expr: &str, e: &ErreurExpr) {
    let n = expr.chars().count();
    assert!(
        e.emplacement.debut <= e.emplacement.fin && e.emplacement.fin <= n,
        "emplacement hors texte: expr={expr:?} err={e}"
    );
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

fn gen_nombre(rng: &mut Rng) -> String {
    let s = rng.choose(&["0", "1", "2", "3", "7", "10", "0.5", "2.25", "1_000", "0.001"]);
    s.to_string()
}

fn gen_atom(rng: &mut Rng) -> String {
    match rng.pick(6) {
        0 | 1 | 2 => gen_nombre(rng),
        3 => "Pi".to_string(),
        4 => "e".to_string(),
        _ => format!("(-{})", gen_nombre(rng)),
    }
}

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_atom(rng);
    }

    let sous = |rng: &mut Rng| gen_expr(rng, depth - 1);

    match rng.pick(12) {
        0 => gen_atom(rng),
        1 => format!("({}+{})", sous(rng), sous(rng)),
        2 => format!("({}-{})", sous(rng), sous(rng)),
        3 => format!("({}*{})", sous(rng), sous(rng)),
        4 => format!("({}/{})", sous(rng), sous(rng)),
        5 => {
            let op = rng.choose(&["//", "%"]);
            format!("({} {op} {})", sous(rng), sous(rng))
        }
        6 => {
            // exposant contrôlé (petit entier ou demi)
            let exp = rng.choose(&["2", "3", "-1", "0.5", "0"]);
            format!("({})^{exp}", sous(rng))
        }
        7 => {
            let f = rng.choose(&["sqrt", "abs", "round", "floor", "ceil", "roundUp"]);
            format!("{f}({})", sous(rng))
        }
        8 => {
            let f = rng.choose(&["min", "max", "round", "root"]);
            let second = if f == "min" || f == "max" {
                sous(rng)
            } else {
                rng.choose(&["0", "1", "2", "3"]).to_string()
            };
            format!("{f}({}, {second})", sous(rng))
        }
        9 => {
            let f = rng.choose(&["sin", "cos", "tan"]);
            format!("{f}({})", sous(rng))
        }
        10 => {
            let u = rng.choose(&["-", "+", "++", "--"]);
            // parenthésé : `3-(-(x))` et non `3--(x)`
            format!("({u}({}))", sous(rng))
        }
        _ => {
            if rng.coin() {
                "rand()".to_string()
            } else {
                format!("rad({})", sous(rng))
            }
        }
    }
}

/// Soupe de jetons : souvent mal formée, ne doit JAMAIS paniquer.
fn gen_soupe(rng: &mut Rng) -> String {
    const MORCEAUX: [&str; 24] = [
        "1", "2", "0", "3.5", "(", ")", ",", "+", "-", "*", "/", "//", "%", "^", "@", "++", "--",
        "Pi", "e", "sqrt", "max", "round", "$", "_",
    ];
    let n = 1 + rng.pick(12) as usize;
    let mut s = String::new();
    for _ in 0..n {
        let m = rng.choose(&MORCEAUX);
        s.push_str(m);
        // pas de nombres collés (`1` `2` `0` => 120 comme indice de racine)
        let valeur = m.starts_with(|c: char| c.is_ascii_alphanumeric() || c == '_');
        if valeur || rng.coin() {
            s.push(' ');
        }
    }
    s
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

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_determinisme_et_aller_retour() {
    let t0 = Instant::now();
    let max = Duration::from_secs(20);

    // Même seed => mêmes expressions => mêmes sorties (déterminisme)
    let mut rng = Rng::new(0xC0FFEE_u64);
    let mut a = Executeur::avec_graine(9);
    let mut b = Executeur::avec_graine(9);

    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for _ in 0..120 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 3);

        let ra = a.executer(&expr, 32);
        let rb = b.executer(&expr, 32);
        assert_eq!(ra, rb, "non déterministe: expr={expr:?}");

        match ra {
            Ok(v) => {
                // rendu relu => même rendu
                let relu = a.executer(&v, 32);
                b.executer(&v, 32).ok();
                assert_eq!(relu.as_ref(), Ok(&v), "aller-retour: expr={expr:?}");
                seen_ok += 1;
            }
            Err(e) => {
                check_emplacement(&expr, &e);
                assert!(
                    is_erreur_attendue(&e),
                    "erreur non attendue: expr={expr:?} err={e}"
                );
                seen_err += 1;
            }
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(seen_ok > 10, "trop peu de succès: {seen_ok}");
    assert!(seen_err > 0, "aucune erreur vue: fuzz trop “sage”");
}

#[test]
fn fuzz_safe_soupe_de_jetons_sans_panique() {
    let t0 = Instant::now();
    let max = Duration::from_secs(20);

    let mut rng = Rng::new(0xBADC0DE_u64);
    let mut ex = Executeur::avec_graine(3);
    let mut seen_err = 0usize;

    for _ in 0..400 {
        budget(t0, max);

        let expr = gen_soupe(&mut rng);
        if let Err(e) = ex.executer(&expr, 16) {
            check_emplacement(&expr, &e);
            assert_ne!(e.genre, GenreErreur::Interne, "expr={expr:?} err={e}");
            seen_err += 1;
        }
    }

    assert!(seen_err > 100, "soupe trop “propre”: {seen_err}");
}

#[test]
fn fuzz_safe_somme_balancee_anti_pile() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    // 1024 termes => 10 niveaux de parenthèses seulement
    let expr = somme_balancee("1/2", 1024);
    budget(t0, max);

    let v = Executeur::avec_graine(0)
        .executer(&expr, 10)
        .unwrap_or_else(|e| panic!("err: {e}"));

    // 1024*(1/2) = 512
    assert_eq!(v, "512");
}
