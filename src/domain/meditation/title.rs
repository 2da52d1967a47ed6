//! Titles per meditation theme.

use rand::seq::SliceRandom;
use rand::Rng;

const SLEEP: &[&str] = &["Droga do Snu", "Spokojna Noc", "Sen Gleboki", "Wieczorne Wyciszenie"];
const ANXIETY: &[&str] = &["Spokoj Wewnetrzny", "Oddech Spokoju", "Uwolnienie Leku", "Cisza Umyslu"];
const FOCUS: &[&str] = &["Jasnosc Umyslu", "Pelna Obecnosc", "Ostry Fokus", "Energia Koncentracji"];
const ENERGY: &[&str] = &["Przebudzenie Energii", "Witalnosc", "Swiatlo Zycia", "Moc Poranka"];

/// Candidate titles for a goal. Unknown goals use the anxiety set.
pub fn titles_for(goal: &str) -> &'static [&'static str] {
    match goal {
        "sleep" => SLEEP,
        "focus" => FOCUS,
        "energy" => ENERGY,
        _ => ANXIETY,
    }
}

/// Picks a title for the goal at random.
pub fn pick_title<R: Rng + ?Sized>(goal: &str, rng: &mut R) -> &'static str {
    let titles = titles_for(goal);
    titles.choose(rng).copied().unwrap_or(ANXIETY[0])
}
