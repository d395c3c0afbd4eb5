// src/noyau/decimal.rs
//
// Décimal à précision arbitraire (sur BigRational)
// ------------------------------------------------
// Toutes les valeurs du pipeline restent des décimaux FINIS :
// - add/sub/mul : exacts
// - divisions, puissances, racines, trig : arrondies à PRECISION_TRAVAIL chiffres
//
// Arrondi : demi-unité loin de zéro (Ratio::round).

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock, PoisonError};

use super::erreur::ErreurCalcul;

/// Chiffres après la virgule gardés par les opérations non exactes.
pub const PRECISION_TRAVAIL: usize = 32;

/// Chiffres de garde pour les séries (retirés à l’arrondi final).
const GARDE: usize = 10;

/// Budget fixe de la racine n-ième (pas de test de tolérance).
pub const ITERATIONS_RACINE: usize = 256;

/// Garde-fou : |exposant| (et indice de racine, places d’arrondi) maximal.
pub const EXPOSANT_MAX: i64 = 100_000;

/// Garde-fou : chiffres de la partie entière d’un angle (π serait calculé à autant de chiffres).
pub const ANGLE_MAX_CHIFFRES: usize = 1_000;

const LOG10_2: f64 = std::f64::consts::LOG10_2;

/* ------------------------ Outils ------------------------ */

fn pow10(n: usize) -> BigInt {
    BigInt::from(10).pow(n as u32)
}

fn entier(n: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(n))
}

/// 10^places (places éventuellement négatif).
fn facteur_places(places: i64) -> BigRational {
    let p = pow10(places.unsigned_abs() as usize);
    if places >= 0 {
        BigRational::from_integer(p)
    } else {
        BigRational::new(BigInt::one(), p)
    }
}

fn chiffres_de(n: i64) -> usize {
    n.unsigned_abs().to_string().len()
}

/// log2(|x|) approché, x ≠ 0 : les 64 bits de tête suffisent.
fn log2_entier(x: &BigInt) -> f64 {
    let decalage = x.bits().saturating_sub(64);
    let tete = (x.abs() >> decalage).to_f64().unwrap_or(1.0);
    tete.log2() + decalage as f64
}

/// log2(|x|) approché, x ≠ 0.
fn log2_approx(x: &BigRational) -> f64 {
    log2_entier(x.numer()) - log2_entier(x.denom())
}

/// Entier (rationnel) -> i64 borné par EXPOSANT_MAX.
pub fn vers_i64_borne(x: &BigRational) -> Result<i64, ErreurCalcul> {
    x.to_integer()
        .to_i64()
        .filter(|n| n.unsigned_abs() <= EXPOSANT_MAX as u64)
        .ok_or(ErreurCalcul::ExposantTropGrand)
}

/* ------------------------ Lecture / écriture ------------------------ */

/// Lit un littéral : chiffres, `_` séparateurs, fraction `.` optionnelle.
///
/// `_` n’est accepté qu’entre deux chiffres (`1_000` oui, `1__0`, `_1`, `1_.5` non).
pub fn depuis_texte(texte: &str) -> Option<BigRational> {
    let chars: Vec<char> = texte.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if *c != '_' {
            continue;
        }
        let avant = i.checked_sub(1).and_then(|k| chars.get(k));
        let apres = chars.get(i + 1);
        let entoure = matches!(avant, Some(a) if a.is_ascii_digit())
            && matches!(apres, Some(b) if b.is_ascii_digit());
        if !entoure {
            return None;
        }
    }

    let propre: String = chars.into_iter().filter(|c| *c != '_').collect();
    let (ent, frac) = match propre.split_once('.') {
        Some((a, b)) => {
            if b.is_empty() {
                return None;
            }
            (a, b)
        }
        None => (propre.as_str(), ""),
    };

    if ent.is_empty()
        || !ent.bytes().all(|b| b.is_ascii_digit())
        || !frac.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let chiffres = format!("{ent}{frac}");
    let n = BigInt::parse_bytes(chiffres.as_bytes(), 10)?;
    Some(BigRational::new(n, pow10(frac.len())))
}

/// f64 -> décimal arrondi à la précision de travail (sert à rand()).
pub fn depuis_f64(x: f64) -> Option<BigRational> {
    BigRational::from_float(x).map(|r| arrondir(&r, PRECISION_TRAVAIL))
}

/// Arrondi à `chiffres` décimales (demi loin de zéro).
pub fn arrondir(x: &BigRational, chiffres: usize) -> BigRational {
    if x.is_integer() {
        return x.clone();
    }
    let s = BigRational::from_integer(pow10(chiffres));
    (x * &s).round() / s
}

/// Arrondi à `places` décimales, `places` pouvant être négatif (dizaines, centaines...).
pub fn arrondir_a(x: &BigRational, places: i64) -> BigRational {
    let s = facteur_places(places);
    (x * &s).round() / s
}

/// Arrondi “loin de zéro” à `places` décimales.
pub fn arrondir_haut_a(x: &BigRational, places: i64) -> BigRational {
    let s = facteur_places(places);
    let t = x * &s;
    let r = if t.is_integer() {
        t
    } else {
        t.trunc() + t.signum()
    };
    r / s
}

/// Convertit un entier “scalé” (×10^digits) en texte décimal.
fn scaled_to_decimal(mut scaled: BigInt, digits: usize) -> String {
    let neg = scaled.is_negative();
    if neg {
        scaled = -scaled;
    }

    let scale = pow10(digits);
    let int_part = &scaled / &scale;
    let frac_part = &scaled % &scale;

    if digits == 0 {
        return if neg {
            format!("-{int_part}")
        } else {
            format!("{int_part}")
        };
    }

    let mut frac = frac_part.to_str_radix(10);
    while frac.len() < digits {
        frac.insert(0, '0');
    }

    if neg {
        format!("-{int_part}.{frac}")
    } else {
        format!("{int_part}.{frac}")
    }
}

/// Rendu canonique (non scientifique) arrondi à `chiffres` décimales.
///
/// Les zéros de fin (et le point orphelin) sont retirés : `2.50` -> `2.5`, `3.0` -> `3`.
pub fn en_texte(x: &BigRational, chiffres: usize) -> String {
    let r = arrondir(x, chiffres);
    // r = k / 10^chiffres (réduit) : la division est exacte
    let scaled = (r.numer() * pow10(chiffres)) / r.denom();

    let mut s = scaled_to_decimal(scaled, chiffres);
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    s
}

/* ------------------------ Puissances ------------------------ */

/// m·10^e : mantisse entière tronquée à un nombre de chiffres significatifs.
///
/// Sert aux puissances arrondies : pas de pgcd à chaque produit, contrairement à BigRational.
#[derive(Clone, Debug)]
struct Mantisse {
    m: BigInt,
    e: i64,
}

impl Mantisse {
    fn un() -> Self {
        Self {
            m: BigInt::one(),
            e: 0,
        }
    }

    fn depuis(x: &BigRational, s: usize) -> Self {
        if x.is_zero() {
            return Self {
                m: BigInt::zero(),
                e: 0,
            };
        }
        let ordre = (log2_approx(x) * LOG10_2).floor() as i64;
        let e = ordre - s as i64;
        let m = (x * facteur_places(-e)).round().to_integer();
        Self { m, e }
    }

    fn fois(&self, autre: &Self, s: usize) -> Self {
        Self {
            m: &self.m * &autre.m,
            e: self.e + autre.e,
        }
        .tronquer(s)
    }

    fn tronquer(mut self, s: usize) -> Self {
        if self.m.is_zero() {
            return self;
        }
        // à un chiffre près, par excès
        let chiffres = (self.m.bits() as f64 * LOG10_2).ceil() as i64;
        let exces = chiffres - s as i64;
        if exces > 0 {
            let d = pow10(exces as usize);
            let q = (self.m.abs() + (&d >> 1u32)) / &d;
            self.m = if self.m.is_negative() { -q } else { q };
            self.e += exces;
        }
        self
    }

    fn vers_rationnel(&self) -> BigRational {
        BigRational::from_integer(self.m.clone()) * facteur_places(self.e)
    }
}

/// base^exp exact (entiers naturels en exposant).
pub fn puissance_entiere(base: BigRational, exp: u64) -> BigRational {
    let mut e = exp;
    let mut acc = BigRational::one();
    let mut b = base;

    while e > 0 {
        if (e & 1) == 1 {
            acc *= b.clone();
        }
        e >>= 1;
        if e > 0 {
            b *= b.clone();
        }
    }
    acc
}

/// base^exp à environ `s` chiffres significatifs (carrés successifs, chacun arrondi).
fn puissance_arrondie(base: &BigRational, exp: u64, s: usize) -> BigRational {
    let mut e = exp;
    let mut acc = Mantisse::un();
    let mut b = Mantisse::depuis(base, s);

    while e > 0 {
        if (e & 1) == 1 {
            acc = acc.fois(&b, s);
        }
        e >>= 1;
        if e > 0 {
            b = b.fois(&b, s);
        }
    }
    acc.vers_rationnel()
}

/// base^exposant, bornée à la précision de travail.
///
/// Cas limites : 0^0 indéfini, 0^négatif infini, négatif^non-entier imaginaire.
pub fn puissance(base: &BigRational, exposant: &BigRational) -> Result<BigRational, ErreurCalcul> {
    if base.is_zero() && exposant.is_zero() {
        return Err(ErreurCalcul::ZeroPuissanceZero);
    }
    if base.is_zero() && exposant.is_negative() {
        return Err(ErreurCalcul::Infini);
    }
    if base.is_negative() && !exposant.is_integer() {
        return Err(ErreurCalcul::Imaginaire);
    }

    if exposant.is_integer() {
        let n = vers_i64_borne(exposant)?;
        if base.is_integer() && n >= 0 {
            return Ok(puissance_entiere(base.clone(), n.unsigned_abs()));
        }

        // ordre de grandeur du résultat, en puissances de 10
        let ordre = n as f64 * log2_approx(base) * LOG10_2;
        if ordre < -((PRECISION_TRAVAIL + 2) as f64) {
            return Ok(BigRational::zero());
        }
        let s = PRECISION_TRAVAIL + GARDE + chiffres_de(n) + ordre.max(0.0).ceil() as usize;
        let r = puissance_arrondie(base, n.unsigned_abs(), s);
        let r = if n < 0 { r.recip() } else { r };
        return Ok(arrondir(&r, PRECISION_TRAVAIL));
    }

    if exposant.abs() > entier(EXPOSANT_MAX) {
        return Err(ErreurCalcul::ExposantTropGrand);
    }
    if base.is_zero() {
        return Ok(BigRational::zero());
    }

    // base > 0 ici : base^y = exp(y·ln(base))
    let l = ln(base, PRECISION_TRAVAIL + GARDE);
    Ok(exp(&(exposant * l), PRECISION_TRAVAIL))
}

/* ------------------------ Racine n-ième ------------------------ */

/// Racine n-ième itérative : x ← a·x + b/x^(n-1), a=(n-1)/n, b=radicande/n.
///
/// x₀ est pris juste au-dessus de la racine (estimation en f64) : la suite descend
/// alors vers la racine, quadratiquement, quel que soit l’indice.
///
/// Indice négatif : on inverse le radicande et on prend l’opposé de l’indice.
/// Le signe du radicande est vérifié AVANT cette transformation.
pub fn racine_n(radicande: &BigRational, indice: &BigRational) -> Result<BigRational, ErreurCalcul> {
    if radicande.is_negative() {
        return Err(ErreurCalcul::RacineNegative);
    }
    if !indice.is_integer() {
        return Err(ErreurCalcul::IndiceNonEntier);
    }
    if indice.is_zero() {
        return Err(ErreurCalcul::IndiceNul);
    }

    let (radicande, indice) = if indice.is_negative() {
        if radicande.is_zero() {
            return Err(ErreurCalcul::DivisionParZero);
        }
        (radicande.recip(), -indice)
    } else {
        (radicande.clone(), indice.clone())
    };

    if radicande.is_zero() {
        return Ok(BigRational::zero());
    }

    let n = vers_i64_borne(&indice)?;
    let p = PRECISION_TRAVAIL + GARDE;

    let n_rat = entier(n);
    let a = entier(n - 1) / &n_rat;
    let b = &radicande / &n_rat;

    // x^(n-1) en relatif : assez de chiffres pour la partie entière de la racine
    let log2_racine = log2_approx(&radicande) / n as f64;
    let entiers = (log2_racine * LOG10_2).max(0.0).ceil() as usize;
    let s = p + entiers + chiffres_de(n) + GARDE;

    let mut x = depart_racine(log2_racine);
    for _ in 0..ITERATIONS_RACINE {
        if x.is_zero() {
            // racine plus petite que 10^-p : rien à lire à cette précision
            return Ok(BigRational::zero());
        }
        let x_pow = puissance_arrondie(&x, (n - 1).unsigned_abs(), s);
        x = arrondir(&(&a * &x + &b / x_pow), p);
    }

    Ok(arrondir(&x, PRECISION_TRAVAIL))
}

/// Départ de Newton : 2^l majoré d’un milliardième (l = log2 de la racine).
fn depart_racine(l: f64) -> BigRational {
    let k = l.floor();
    let m = (l - k).exp2() * (1.0 + 1e-9);
    let m = BigRational::from_float(m).unwrap_or_else(BigRational::one);
    let deux_k = puissance_entiere(entier(2), k.abs() as u64);
    if k >= 0.0 {
        m * deux_k
    } else {
        m / deux_k
    }
}

/* ------------------------ π (Machin) + cache ------------------------ */

/// arctan(1/q) en entier scalé (troncature) via série:
/// atan(z) = z - z^3/3 + z^5/5 - ...
fn arctan_inv_q_scaled(q: i64, scale: &BigInt) -> BigInt {
    let q = BigInt::from(q);

    let mut k: usize = 0;
    let mut sign_pos = true;

    // q^(2k+1)
    let mut q_pow = q.clone();
    let mut sum = BigInt::zero();

    loop {
        let denom = BigInt::from((2 * k + 1) as i64);
        let d = &q_pow * &denom;

        let term = scale / &d;
        if term.is_zero() {
            break;
        }

        if sign_pos {
            sum += &term;
        } else {
            sum -= &term;
        }

        q_pow *= &q;
        q_pow *= &q;

        sign_pos = !sign_pos;
        k += 1;
    }

    sum
}

fn pi_scaled_compute(digits: usize) -> BigInt {
    let scale = pow10(digits + GARDE);

    // Machin : π = 16*atan(1/5) - 4*atan(1/239)
    let a = arctan_inv_q_scaled(5, &scale);
    let b = arctan_inv_q_scaled(239, &scale);

    let mut pi = BigInt::from(16) * a - BigInt::from(4) * b;

    pi /= pow10(GARDE);
    pi
}

static PI_CACHE: OnceLock<Mutex<HashMap<usize, BigInt>>> = OnceLock::new();

fn pi_scaled_cached(digits: usize) -> BigInt {
    let m = PI_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let mut guard = m.lock().unwrap_or_else(PoisonError::into_inner);

    if let Some(v) = guard.get(&digits) {
        return v.clone();
    }

    let v = pi_scaled_compute(digits);
    guard.insert(digits, v.clone());
    v
}

/// π arrondi à `chiffres` décimales.
pub fn pi(chiffres: usize) -> BigRational {
    let tronque = BigRational::new(pi_scaled_cached(chiffres + GARDE), pow10(chiffres + GARDE));
    arrondir(&tronque, chiffres)
}

/// e arrondi à `chiffres` décimales.
pub fn e(chiffres: usize) -> BigRational {
    exp(&BigRational::one(), chiffres)
}

/* ------------------------ exp / ln ------------------------ */

/// exp(x) : réduction x/2^k (|x| ≤ 1/2), série de Taylor, puis k mises au carré.
pub fn exp(x: &BigRational, chiffres: usize) -> BigRational {
    let demi = BigRational::new(BigInt::one(), BigInt::from(2));
    let deux = entier(2);

    let mut y = x.clone();
    let mut k = 0usize;
    while y.abs() > demi {
        y /= &deux;
        k += 1;
    }

    let p = chiffres + GARDE + k;

    let mut terme = BigRational::one();
    let mut somme = BigRational::one();
    let mut n: i64 = 1;
    loop {
        terme = arrondir(&(&terme * &y / entier(n)), p);
        if terme.is_zero() {
            break;
        }
        somme += &terme;
        n += 1;
    }

    for _ in 0..k {
        somme = arrondir(&(&somme * &somme), p);
    }

    arrondir(&somme, chiffres)
}

/// atanh(z) = z + z^3/3 + z^5/5 + ... (|z| ≤ 1/3 ici)
fn atanh(z: &BigRational, p: usize) -> BigRational {
    let z2 = arrondir(&(z * z), p);

    let mut puiss = z.clone();
    let mut somme = BigRational::zero();
    let mut n: i64 = 0;
    loop {
        let t = arrondir(&(&puiss / entier(2 * n + 1)), p);
        if t.is_zero() {
            break;
        }
        somme += &t;
        puiss = arrondir(&(&puiss * &z2), p);
        n += 1;
    }
    somme
}

/// ln(x), x > 0 : x = m·2^k avec m ∈ [1/2, 1], ln(m) = 2·atanh((m-1)/(m+1)).
pub fn ln(x: &BigRational, chiffres: usize) -> BigRational {
    debug_assert!(x.is_positive(), "ln d’un nombre non positif");

    let un = BigRational::one();
    let deux = entier(2);
    let demi = BigRational::new(BigInt::one(), BigInt::from(2));

    let mut m = x.clone();
    let mut k: i64 = 0;
    while m > un {
        m /= &deux;
        k += 1;
    }
    while m < demi {
        m *= &deux;
        k -= 1;
    }

    let p = chiffres + GARDE + k.unsigned_abs().to_string().len();

    let z = arrondir(&((&m - &un) / (&m + &un)), p);
    let ln_m = atanh(&z, p) * &deux;
    let ln2 = atanh(&BigRational::new(BigInt::one(), BigInt::from(3)), p) * &deux;

    arrondir(&(ln_m + ln2 * entier(k)), chiffres)
}

/* ------------------------ Trigonométrie ------------------------ */

/// x - k·2π avec k = round(x / 2π), π pris assez précis pour la grandeur de x.
fn reduire_angle(x: &BigRational, p: usize) -> Result<BigRational, ErreurCalcul> {
    let grandeur = x.abs().to_integer().bits() as f64 * LOG10_2;
    if grandeur > ANGLE_MAX_CHIFFRES as f64 {
        return Err(ErreurCalcul::AngleTropGrand);
    }
    let deux_pi = pi(p + grandeur.ceil() as usize + 1) * entier(2);
    let k = (x / &deux_pi).round();
    Ok(arrondir(&(x - k * deux_pi), p))
}

/// Série alternée de sin (depart = y, indice 1) ou cos (depart = 1, indice 0).
fn serie_trig(y: &BigRational, depart: BigRational, indice: i64, p: usize) -> BigRational {
    let y2 = arrondir(&(y * y), p);

    let mut terme = depart;
    let mut somme = terme.clone();
    let mut n = indice;
    loop {
        let d = entier((n + 1) * (n + 2));
        terme = arrondir(&(-(&terme * &y2) / d), p);
        if terme.is_zero() {
            break;
        }
        somme += &terme;
        n += 2;
    }
    somme
}

fn sin_brut(x: &BigRational, p: usize) -> Result<BigRational, ErreurCalcul> {
    let y = reduire_angle(x, p)?;
    Ok(serie_trig(&y, y.clone(), 1, p))
}

fn cos_brut(x: &BigRational, p: usize) -> Result<BigRational, ErreurCalcul> {
    let y = reduire_angle(x, p)?;
    Ok(serie_trig(&y, BigRational::one(), 0, p))
}

pub fn sin(x: &BigRational, chiffres: usize) -> Result<BigRational, ErreurCalcul> {
    Ok(arrondir(&sin_brut(x, chiffres + GARDE)?, chiffres))
}

pub fn cos(x: &BigRational, chiffres: usize) -> Result<BigRational, ErreurCalcul> {
    Ok(arrondir(&cos_brut(x, chiffres + GARDE)?, chiffres))
}

/// tan = sin/cos ; indéfinie si cos s’annule à la précision demandée.
pub fn tan(x: &BigRational, chiffres: usize) -> Result<BigRational, ErreurCalcul> {
    let p = chiffres + GARDE;
    let c = cos_brut(x, p)?;
    if arrondir(&c, chiffres).is_zero() {
        return Err(ErreurCalcul::TangenteIndefinie);
    }
    let s = sin_brut(x, p)?;
    Ok(arrondir(&(s / c), chiffres))
}
