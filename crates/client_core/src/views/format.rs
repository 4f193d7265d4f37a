use chrono::Datelike;
use shared::domain::parse_date;

const MONTHS: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Jui", "Jui", "Aoû", "Sep", "Oct", "Nov", "Déc",
];

/// `2004-04-04` becomes `4 Avr. 04`. `None` when the date does not parse.
pub fn format_date(raw: &str) -> Option<String> {
    let date = parse_date(raw)?;
    let month = MONTHS[date.month0() as usize];
    let year = date.year().rem_euclid(100);
    Some(format!("{} {month}. {year:02}", date.day()))
}

pub fn format_amount(amount: f64) -> String {
    format!("{amount} €")
}
