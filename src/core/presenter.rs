use crate::domain::model::{AggregatedResult, MovieListing, Showtime, TheatreResult};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

const THEATRE_RULE: &str = "-------------------";
const TABLE_HEADER: &str = "| Movie | Genre | Rating | Runtime | Showtimes |";
const TABLE_DIVIDER: &str = "|-------|--------|---------|----------|-----------|";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    /// 純文字清單，適合語音朗讀
    #[default]
    List,
    /// Markdown 表格，給即時/聊天介面
    Table,
}

/// 12 小時制，不補零（例如 `2:00 PM`）
pub fn format_time(start_time: &NaiveDateTime) -> String {
    start_time.format("%-I:%M %p").to_string()
}

pub fn format_showtime(showtime: &Showtime) -> String {
    let availability = if showtime.is_sold_out {
        "(Sold Out)".to_string()
    } else {
        format!("({} seats)", showtime.seats_remaining)
    };
    format!("{} {}", format_time(&showtime.start_time), availability)
}

pub fn format_showtimes(showtimes: &[Showtime]) -> String {
    if showtimes.is_empty() {
        return "None".to_string();
    }
    showtimes
        .iter()
        .map(format_showtime)
        .collect::<Vec<_>>()
        .join(", ")
}

/// `date` 只在呼叫端明確指定日期時帶入
pub fn no_movies_message(city: &str, province: &str, date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => format!(
            "No movies found for {}, {}, {}.",
            city,
            province,
            date.format("%Y-%m-%d")
        ),
        None => format!("No movies found for {}, {}.", city, province),
    }
}

pub fn render(
    result: &AggregatedResult,
    style: OutputStyle,
    city: &str,
    province: &str,
    requested_date: Option<NaiveDate>,
) -> String {
    if result.is_empty() {
        return no_movies_message(city, province, requested_date);
    }

    match style {
        OutputStyle::List => render_list(result),
        OutputStyle::Table => render_table(result),
    }
}

pub fn render_list(result: &AggregatedResult) -> String {
    let mut output = Vec::new();

    for theatre in &result.theatres {
        output.push(format!("\n{}", theatre.theatre_name));
        output.push(THEATRE_RULE.to_string());

        for movie in &theatre.movies {
            push_movie_lines(&mut output, movie);
        }

        output.push(format!("{}\n", THEATRE_RULE));
    }

    output.join("\n")
}

fn push_movie_lines(output: &mut Vec<String>, movie: &MovieListing) {
    output.push(format!("• {}", movie.title));
    output.push(format!("  Genre: {}", movie.genre));
    output.push(format!("  Rating: {}", movie.rating));
    output.push(format!("  Runtime: {} mins", movie.runtime_minutes));
    output.push(format!("  Showtimes: {}", format_showtimes(&movie.showtimes)));
    output.push(String::new());
}

pub fn render_table(result: &AggregatedResult) -> String {
    result
        .theatres
        .iter()
        .map(render_theatre_table)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_theatre_table(theatre: &TheatreResult) -> String {
    let mut lines = vec![
        format!("\nTheatre: {}", theatre.theatre_name),
        format!("\n{}", TABLE_HEADER),
        TABLE_DIVIDER.to_string(),
    ];

    for movie in &theatre.movies {
        lines.push(format!(
            "| {} | {} | {} | {} mins | {} |",
            table_cell(&movie.title),
            table_cell(&movie.genre),
            table_cell(&movie.rating),
            movie.runtime_minutes,
            format_showtimes(&movie.showtimes)
        ));
    }

    lines.join("\n")
}

fn table_cell(value: &str) -> String {
    value.replace('|', "\\|")
}
