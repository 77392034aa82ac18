// =============================================================================
// Dashboard Page — server-rendered HTML for the four-day outlook
// =============================================================================

use std::fmt::Write as _;

use crate::app_state::{OutlookReport, ReportError};
use crate::signals::BiasLabel;

const DISCLAIMER: &str = "Directional outlook only. Not trading advice.";

fn marker(bias: BiasLabel) -> (&'static str, &'static str) {
    match bias {
        BiasLabel::StrongBullish | BiasLabel::MildBullish => ("bull", "&#x1F7E2;"),
        BiasLabel::Sideways => ("flat", "&#x1F7E1;"),
        BiasLabel::MildBearish | BiasLabel::StrongBearish => ("bear", "&#x1F534;"),
    }
}

/// Minimal escaping for text interpolated into HTML.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

fn render_report(body: &mut String, report: &OutlookReport) {
    for call in &report.outlook.calls {
        let (class, icon) = marker(call.bias);
        let _ = write!(
            body,
            r#"<section class="call {class}"><h3>{icon} {label}</h3><p><b>Bias:</b> {bias}</p><p><b>Confidence:</b> {confidence}%</p></section>"#,
            label = call.label,
            bias = call.bias,
            confidence = call.confidence,
        );
    }

    if let Some(p) = &report.projection {
        let _ = write!(
            body,
            r#"<section class="projection"><h3>MCX estimate</h3><p>Reference: &#8377;{:.2}/kg &middot; expected move today: {:+.2}% (&#8377;{:+.2}/kg)</p></section>"#,
            p.reference_price, p.expected_move_pct, p.expected_move_abs
        );
    }

    if !report.unavailable.is_empty() {
        body.push_str(r#"<p class="note">Unavailable feeds (scored neutral): "#);
        let names: Vec<String> = report
            .unavailable
            .iter()
            .map(|u| escape(&u.symbol))
            .collect();
        body.push_str(&names.join(", "));
        body.push_str("</p>");
    }

    let _ = write!(
        body,
        r#"<p class="caption">Last updated: {}</p>"#,
        report.generated_at.format("%d %b %Y, %I:%M %p UTC")
    );
}

/// Render the whole page for a report or the error that replaced it.
pub fn render_page(result: &Result<OutlookReport, ReportError>) -> String {
    let mut body = String::new();
    match result {
        Ok(report) => render_report(&mut body, report),
        Err(e) => {
            let _ = write!(
                body,
                r#"<p class="error">Not enough market data yet. Please try later. ({})</p>"#,
                escape(&e.to_string())
            );
        }
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Copper Outlook</title>
<style>
body {{ font-family: sans-serif; max-width: 40rem; margin: 2rem auto; }}
.call {{ border-left: 4px solid #ccc; padding-left: 1rem; margin: 1rem 0; }}
.bull {{ border-color: #2e7d32; }}
.flat {{ border-color: #f9a825; }}
.bear {{ border-color: #c62828; }}
.error {{ color: #c62828; }}
.caption, .note {{ color: #666; font-size: 0.9rem; }}
</style>
</head>
<body>
<h1>Copper Price Outlook</h1>
<p class="caption">Hybrid global + India model | 4-Day directional view</p>
<form method="get" action="/"><label>MCX copper (&#8377;/kg) <input name="mcx_price" type="number" step="1"></label> <button>Update</button></form>
<hr>
{body}
<hr>
<p class="caption">&#9888; {DISCLAIMER}</p>
</body>
</html>"#
    )
}
