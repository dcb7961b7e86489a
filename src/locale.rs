use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::deadline::label::{Distance, RelativeFormatter, Tense};

/// Display language for relative labels and calendar headers.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    #[serde(rename = "pt-BR")]
    PtBr,
    #[serde(rename = "en")]
    En,
}

impl Locale {
    pub fn month_name(self, month: u32) -> &'static str {
        const PT: [&str; 12] = [
            "janeiro", "fevereiro", "março", "abril", "maio", "junho",
            "julho", "agosto", "setembro", "outubro", "novembro", "dezembro",
        ];
        const EN: [&str; 12] = [
            "January", "February", "March", "April", "May", "June",
            "July", "August", "September", "October", "November", "December",
        ];
        let idx = (month.clamp(1, 12) - 1) as usize;
        match self {
            Locale::PtBr => PT[idx],
            Locale::En => EN[idx],
        }
    }

    pub fn weekday_short(self, day: Weekday) -> &'static str {
        let idx = day.num_days_from_monday() as usize;
        match self {
            Locale::PtBr => ["Seg", "Ter", "Qua", "Qui", "Sex", "Sáb", "Dom"][idx],
            Locale::En => ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"][idx],
        }
    }

    pub fn weekday_long(self, day: Weekday) -> &'static str {
        let idx = day.num_days_from_monday() as usize;
        match self {
            Locale::PtBr => [
                "segunda-feira", "terça-feira", "quarta-feira", "quinta-feira",
                "sexta-feira", "sábado", "domingo",
            ][idx],
            Locale::En => [
                "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
            ][idx],
        }
    }

    /// Joins a day number and a month name ("5 de março" / "5 March").
    pub fn day_of_month(self, day: u32, month: u32) -> String {
        match self {
            Locale::PtBr => format!("{} de {}", day, self.month_name(month)),
            Locale::En => format!("{} {}", day, self.month_name(month)),
        }
    }

    fn phrase(self, distance: Distance) -> String {
        use Distance::*;
        let plural = |n: i64, one: &str, many: &str| {
            if n == 1 { one.to_string() } else { many.replace("{}", &n.to_string()) }
        };
        match self {
            Locale::PtBr => match distance {
                LessThanMinute => "menos de um minuto".into(),
                Minutes(n) => plural(n, "1 minuto", "{} minutos"),
                AboutHours(n) => plural(n, "cerca de 1 hora", "cerca de {} horas"),
                Days(n) => plural(n, "1 dia", "{} dias"),
                AboutMonths(n) => plural(n, "cerca de 1 mês", "cerca de {} meses"),
                Months(n) => plural(n, "1 mês", "{} meses"),
                AboutYears(n) => plural(n, "cerca de 1 ano", "cerca de {} anos"),
                OverYears(n) => plural(n, "mais de 1 ano", "mais de {} anos"),
                AlmostYears(n) => plural(n, "quase 1 ano", "quase {} anos"),
            },
            Locale::En => match distance {
                LessThanMinute => "less than a minute".into(),
                Minutes(n) => plural(n, "1 minute", "{} minutes"),
                AboutHours(n) => plural(n, "about 1 hour", "about {} hours"),
                Days(n) => plural(n, "1 day", "{} days"),
                AboutMonths(n) => plural(n, "about 1 month", "about {} months"),
                Months(n) => plural(n, "1 month", "{} months"),
                AboutYears(n) => plural(n, "about 1 year", "about {} years"),
                OverYears(n) => plural(n, "over 1 year", "over {} years"),
                AlmostYears(n) => plural(n, "almost 1 year", "almost {} years"),
            },
        }
    }
}

impl RelativeFormatter for Locale {
    fn format(&self, distance: Distance, tense: Tense) -> String {
        let phrase = self.phrase(distance);
        match (self, tense) {
            (Locale::PtBr, Tense::Future) => format!("em {}", phrase),
            (Locale::PtBr, Tense::Past) => format!("há {}", phrase),
            (Locale::En, Tense::Future) => format!("in {}", phrase),
            (Locale::En, Tense::Past) => format!("{} ago", phrase),
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "pt-br" | "pt" => Ok(Locale::PtBr),
            "en" | "en-us" => Ok(Locale::En),
            other => Err(format!("unsupported locale '{}' (use pt-BR or en)", other)),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::PtBr => write!(f, "pt-BR"),
            Locale::En => write!(f, "en"),
        }
    }
}
