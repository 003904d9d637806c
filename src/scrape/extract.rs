//! Turns the raw listing page into structured match rows.

use scraper::{Html, Selector};

use crate::types::{MatchRow, ScrapeResult};

use super::fetch::{PageFetcher, ScrapeError};

// css classes on the listing page. The odds columns carry opaque
// "noborder" classes; in page order they are win / draw / loss.
const PERIOD_SELECTOR: &str = ".top";
const HOME_SELECTOR: &str = ".homenameobj.homename";
const AWAY_SELECTOR: &str = ".awaynameobj.awayname";
const WIN_SELECTOR: &str = ".noborder0";
const DRAW_SELECTOR: &str = ".noborder1";
const LOSS_SELECTOR: &str = ".noborder2";

/// Fetches the listing page and parses it into a [`ScrapeResult`].
///
/// Stateless across invocations apart from the reused HTTP agent.
pub struct Extractor {
    fetcher: PageFetcher,
}

impl Extractor {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            fetcher: PageFetcher::new(url),
        }
    }

    /// One fetch-and-parse attempt against the listing page.
    pub fn extract(&self) -> Result<ScrapeResult, ScrapeError> {
        let html = self.fetcher.fetch()?;
        parse_listing(&html)
    }
}

/// Parse a decoded listing page.
///
/// The page lays the five columns out as parallel element sequences, zipped
/// by position. Any length mismatch means the layout changed and the whole
/// scrape is structurally invalid.
pub fn parse_listing(html: &str) -> Result<ScrapeResult, ScrapeError> {
    let document = Html::parse_document(html);

    let period = select_first_text(&document, PERIOD_SELECTOR)?
        .ok_or_else(|| ScrapeError::Structure("period marker not found".to_string()))?;

    let home_teams = select_all_texts(&document, HOME_SELECTOR)?;
    let away_teams = select_all_texts(&document, AWAY_SELECTOR)?;
    let win = select_all_texts(&document, WIN_SELECTOR)?;
    let draw = select_all_texts(&document, DRAW_SELECTOR)?;
    let loss = select_all_texts(&document, LOSS_SELECTOR)?;

    if home_teams.is_empty() || away_teams.is_empty() {
        return Err(ScrapeError::Structure("no match rows found".to_string()));
    }

    let n = home_teams.len();
    if away_teams.len() != n || win.len() != n || draw.len() != n || loss.len() != n {
        return Err(ScrapeError::Structure(format!(
            "column lengths disagree: {} home, {} away, {}/{}/{} odds",
            n,
            away_teams.len(),
            win.len(),
            draw.len(),
            loss.len()
        )));
    }

    let rows = home_teams
        .into_iter()
        .zip(away_teams)
        .zip(win)
        .zip(draw)
        .zip(loss)
        .map(|((((home_team, away_team), win), draw), loss)| MatchRow {
            home_team,
            away_team,
            win,
            draw,
            loss,
        })
        .collect();

    Ok(ScrapeResult { period, rows })
}

fn select_first_text(document: &Html, selector: &str) -> Result<Option<String>, ScrapeError> {
    let sel = Selector::parse(selector).map_err(|e| ScrapeError::Structure(e.to_string()))?;
    Ok(document
        .select(&sel)
        .next()
        .map(|node| node.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty()))
}

fn select_all_texts(document: &Html, selector: &str) -> Result<Vec<String>, ScrapeError> {
    let sel = Selector::parse(selector).map_err(|e| ScrapeError::Structure(e.to_string()))?;
    Ok(document
        .select(&sel)
        .map(|node| node.text().collect::<String>().trim().to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing_page(matches: &[(&str, &str, &str, &str, &str)]) -> String {
        let mut body = String::from("<div class=\"top\">2024015</div>");
        for (home, away, win, draw, loss) in matches {
            body.push_str(&format!(
                "<span class=\"homenameobj homename\">{home}</span>\
                 <span class=\"awaynameobj awayname\">{away}</span>\
                 <div class=\"noborder0\">{win}</div>\
                 <div class=\"noborder1\">{draw}</div>\
                 <div class=\"noborder2\">{loss}</div>"
            ));
        }
        format!("<html><body>{body}</body></html>")
    }

    #[test]
    fn test_parse_well_formed_page() {
        let html = listing_page(&[
            ("拜仁慕尼黑", "多特蒙德", "1.85", "3.40", "4.10"),
            ("阿森纳", "切尔西", "2.10", "3.20", "3.30"),
        ]);

        let result = parse_listing(&html).unwrap();
        assert_eq!(result.period, "2024015");
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[0].home_team, "拜仁慕尼黑");
        assert_eq!(result.rows[0].draw, "3.40");
        assert_eq!(result.rows[1].away_team, "切尔西");
        assert_eq!(result.rows[1].loss, "3.30");
    }

    #[test]
    fn test_display_order_preserved() {
        let html = listing_page(&[
            ("C队", "D队", "1.0", "2.0", "3.0"),
            ("A队", "B队", "4.0", "5.0", "6.0"),
        ]);

        let result = parse_listing(&html).unwrap();
        // Page order, not any sorted order.
        assert_eq!(result.rows[0].home_team, "C队");
        assert_eq!(result.rows[1].home_team, "A队");
    }

    #[test]
    fn test_missing_period_marker_is_structural() {
        let html = "<html><body>\
            <span class=\"homenameobj homename\">主队</span>\
            <span class=\"awaynameobj awayname\">客队</span>\
            </body></html>";

        let err = parse_listing(html).unwrap_err();
        assert!(matches!(err, ScrapeError::Structure(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_missing_teams_is_structural() {
        let html = "<html><body><div class=\"top\">2024015</div></body></html>";
        let err = parse_listing(html).unwrap_err();
        assert!(matches!(err, ScrapeError::Structure(_)));
    }

    #[test]
    fn test_unequal_column_lengths_is_structural() {
        // Two team pairs but only one set of odds cells.
        let mut html = listing_page(&[("主队", "客队", "1.5", "2.5", "3.5")]);
        html = html.replace(
            "</body>",
            "<span class=\"homenameobj homename\">主队二</span>\
             <span class=\"awaynameobj awayname\">客队二</span></body>",
        );

        let err = parse_listing(&html).unwrap_err();
        assert!(matches!(err, ScrapeError::Structure(_)));
    }

    #[test]
    fn test_empty_period_element_is_structural() {
        let html = listing_page(&[("主队", "客队", "1.5", "2.5", "3.5")])
            .replace("<div class=\"top\">2024015</div>", "<div class=\"top\"> </div>");
        let err = parse_listing(&html).unwrap_err();
        assert!(matches!(err, ScrapeError::Structure(_)));
    }
}
