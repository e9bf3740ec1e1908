//! Server-rendered HTML pages.
//!
//! Every dynamic string goes through [`escape`] before it reaches markup.

use crate::{
    db::models::{Fixture, MatchResult, Season},
    league::{ChampionshipOdds, SeasonPhase, TableRow},
};

/// A fixture with its result when it has been played.
#[derive(Debug, Clone)]
pub struct MatchLine {
    pub fixture: Fixture,
    pub result: Option<MatchResult>,
}

#[derive(Debug, Clone)]
pub struct WeekFixtures {
    pub week: i64,
    pub matches: Vec<MatchLine>,
}

/// Everything shown on the league page.
#[derive(Debug, Clone)]
pub struct Overview {
    pub season: Season,
    pub phase: SeasonPhase,
    pub current_week: i64,
    pub total_weeks: i64,
    pub table: Vec<TableRow>,
    pub week_matches: Vec<MatchLine>,
    pub predictions: Vec<ChampionshipOdds>,
}

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; margin: 2rem; }}
table {{ border-collapse: collapse; margin-bottom: 1.5rem; }}
th, td {{ border: 1px solid #ccc; padding: 0.3rem 0.6rem; text-align: left; }}
form.inline {{ display: inline; }}
.banner {{ background: #e6f4e6; border: 1px solid #8c8; padding: 0.8rem; }}
</style>
</head>
<body>
<nav><a href="/">League</a> | <a href="/standings">Standings</a> | <a href="/teams">Teams</a> | <a href="/matches">Matches</a></nav>
{body}
</body>
</html>
"#,
        title = escape(title),
        body = body
    )
}

fn action_button(path: &str, label: &str) -> String {
    format!(
        r#"<form class="inline" method="post" action="{}"><button type="submit">{}</button></form>"#,
        path,
        escape(label)
    )
}

fn score_line(line: &MatchLine) -> String {
    let fixture = &line.fixture;
    match &line.result {
        Some(result) => format!(
            "{} {} - {} {}",
            escape(&fixture.home_team_name),
            result.home_score,
            result.guest_score,
            escape(&fixture.guest_team_name)
        ),
        None => format!(
            "{} vs {}",
            escape(&fixture.home_team_name),
            escape(&fixture.guest_team_name)
        ),
    }
}

fn league_table(rows: &[TableRow]) -> String {
    let mut html = String::from(
        "<table>\n<tr><th>#</th><th>Team</th><th>P</th><th>W</th><th>D</th><th>L</th><th>GD</th><th>Pts</th></tr>\n",
    );
    for row in rows {
        let s = &row.standing;
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:+}</td><td>{}</td></tr>\n",
            row.position,
            escape(&row.team.name),
            row.played(),
            s.wins,
            s.draws,
            s.losses,
            s.goal_diff,
            s.points
        ));
    }
    html.push_str("</table>\n");
    html
}

pub fn overview_page(overview: &Overview) -> String {
    let season = &overview.season;
    let mut body = format!(
        "<h1>Season {}</h1>\n<p>Week {} of {}</p>\n",
        season.year, overview.current_week, overview.total_weeks
    );

    if overview.phase == SeasonPhase::Complete {
        let champion = overview
            .predictions
            .first()
            .map(|odds| escape(&odds.team_name))
            .or_else(|| overview.table.first().map(|row| escape(&row.team.name)))
            .unwrap_or_default();
        body.push_str(&format!(
            "<div class=\"banner\">Season {} is complete. Champion: <strong>{}</strong></div>\n",
            season.year, champion
        ));
    }

    body.push_str("<h2>League Table</h2>\n");
    body.push_str(&league_table(&overview.table));

    let (played, upcoming): (Vec<&MatchLine>, Vec<&MatchLine>) = overview
        .week_matches
        .iter()
        .partition(|line| line.result.is_some());

    body.push_str(&format!("<h2>Week {} Results</h2>\n<ul>\n", overview.current_week));
    if played.is_empty() {
        body.push_str("<li>No matches played yet</li>\n");
    }
    for line in played {
        body.push_str(&format!("<li>{}</li>\n", score_line(line)));
    }
    body.push_str("</ul>\n");

    body.push_str(&format!("<h2>Week {} Fixtures</h2>\n<ul>\n", overview.current_week));
    if upcoming.is_empty() {
        body.push_str("<li>No fixtures left this week</li>\n");
    }
    for line in upcoming {
        body.push_str(&format!("<li>{}</li>\n", score_line(line)));
    }
    body.push_str("</ul>\n");

    if !overview.predictions.is_empty() {
        body.push_str(
            "<h2>Championship Predictions</h2>\n<table>\n<tr><th>Team</th><th>Chance</th></tr>\n",
        );
        for odds in &overview.predictions {
            body.push_str(&format!(
                "<tr><td>{}</td><td>{:.1}%</td></tr>\n",
                escape(&odds.team_name),
                odds.percentage()
            ));
        }
        body.push_str("</table>\n");
    }

    body.push_str("<div>\n");
    for (path, label) in [
        ("/generate-fixtures", "Generate Fixtures"),
        ("/play-week", "Play Week"),
        ("/next-week", "Next Week"),
        ("/play-all", "Play All"),
        ("/start-new-season", "Start New Season"),
        ("/reset-to-2025", "Reset to 2025"),
    ] {
        body.push_str(&action_button(path, label));
        body.push('\n');
    }
    body.push_str("</div>\n");

    layout(&format!("League {}", season.year), &body)
}

fn percentage(part: i64, whole: i64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

pub fn teams_page(season: &Season, rows: &[TableRow]) -> String {
    let mut body = format!(
        "<h1>Teams ({})</h1>\n<table>\n<tr><th>Team</th><th>Strength</th><th>Budget</th><th>Played</th>\
         <th>W</th><th>D</th><th>L</th><th>Pts</th><th>GD</th><th>Win %</th><th>Draw %</th><th>Loss %</th></tr>\n",
        season.year
    );

    for row in rows {
        let s = &row.standing;
        let played = row.played();
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td>{}</td><td>{:+}</td><td>{:.1}</td><td>{:.1}</td><td>{:.1}</td></tr>\n",
            escape(&row.team.name),
            row.team.strength,
            row.team.budget,
            played,
            s.wins,
            s.draws,
            s.losses,
            s.points,
            s.goal_diff,
            percentage(s.wins, played),
            percentage(s.draws, played),
            percentage(s.losses, played)
        ));
    }
    body.push_str("</table>\n");

    layout("Teams", &body)
}

fn edit_form(line: &MatchLine) -> String {
    let (home, guest) = line
        .result
        .map(|r| (r.home_score.to_string(), r.guest_score.to_string()))
        .unwrap_or_default();
    format!(
        r#"<form class="inline" method="post" action="/matches/{}/edit"><input name="home_score" size="2" value="{}"> - <input name="guest_score" size="2" value="{}"> <button type="submit">Save</button></form>"#,
        line.fixture.id, home, guest
    )
}

pub fn matches_page(season: &Season, current_week: i64, weeks: &[WeekFixtures]) -> String {
    let mut body = format!(
        "<h1>Matches ({})</h1>\n<p>Showing weeks 1 to {}</p>\n",
        season.year, current_week
    );

    for week in weeks {
        body.push_str(&format!("<h2>Week {}</h2>\n<ul>\n", week.week));
        if week.matches.is_empty() {
            body.push_str("<li>No fixtures</li>\n");
        }
        for line in &week.matches {
            body.push_str(&format!("<li>{} {}</li>\n", score_line(line), edit_form(line)));
        }
        body.push_str("</ul>\n");
    }

    layout("Matches", &body)
}

pub fn season_complete_page(season: &Season) -> String {
    let body = format!(
        "<div class=\"banner\"><h1>Season {} complete</h1>\n<p>All matches have been played.</p>\n{}</div>\n<p><a href=\"/\">Back to the league</a></p>\n",
        season.year,
        action_button("/start-new-season", "Start New Season")
    );
    layout("Season complete", &body)
}
