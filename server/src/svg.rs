use num_format::{Locale, ToFormattedString};
use shared::Contributor;

const BADGE_TEMPLATE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="240" height="56" viewBox="0 0 240 56" role="img" aria-label="{login}: {tier-label}">
  <title>{login}: {tier-label}</title>
  <rect width="240" height="56" rx="8" fill="#111827"/>
  <circle cx="28" cy="28" r="16" fill="{color}"/>
  <text x="28" y="33" font-family="Verdana,Geneva,sans-serif" font-size="13" font-weight="bold" fill="#111827" text-anchor="middle">{initial}</text>
  <text x="54" y="24" font-family="Verdana,Geneva,sans-serif" font-size="13" fill="#F9FAFB">@{login}</text>
  <text x="54" y="43" font-family="Verdana,Geneva,sans-serif" font-size="11" fill="{color}">{tier} · {score} pts · {place}</text>
</svg>
"##;

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Renders the tier badge for `contributor`. `place` is the leaderboard position, if known.
pub fn generate_svg_badge(contributor: &Contributor, place: Option<usize>) -> String {
    let badge = contributor.badge();
    let login = escape(&contributor.github_username);
    let tier = badge.as_ref().to_uppercase();
    let initial = tier.chars().next().unwrap_or('?').to_string();
    let place = place
        .map(|place| format!("#{place}"))
        .unwrap_or_else(|| "N/A".to_string());

    // Login goes in last so placeholder text inside it stays literal.
    BADGE_TEMPLATE
        .replace("{tier-label}", &escape(badge.label()))
        .replace("{tier}", &tier)
        .replace("{initial}", &initial)
        .replace("{color}", badge.color())
        .replace(
            "{score}",
            &contributor.score().to_formatted_string(&Locale::en),
        )
        .replace("{place}", &place)
        .replace("{login}", &login)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use shared::ScoreSnapshot;

    use super::*;

    fn contributor(name: &str, merged: u64) -> Contributor {
        Contributor::new(
            "0x0".to_string(),
            name.to_string(),
            ScoreSnapshot::from_merged_prs(merged),
            Utc::now(),
        )
    }

    #[test]
    fn badge_shows_tier_score_and_place() {
        let svg = generate_svg_badge(&contributor("alice", 9), Some(1));
        assert!(svg.contains("@alice"));
        assert!(svg.contains("GOLD · 90 pts · #1"));
        assert!(svg.contains("#D4AF37"));
        assert!(!svg.contains('{'));
    }

    #[test]
    fn large_scores_are_grouped() {
        let svg = generate_svg_badge(&contributor("bob", 1234), None);
        assert!(svg.contains("12,340 pts · N/A"));
    }

    #[test]
    fn login_is_escaped() {
        let svg = generate_svg_badge(&contributor("<script>", 0), None);
        assert!(svg.contains("@&lt;script&gt;"));
        assert!(!svg.contains("<script>"));
    }

    #[test]
    fn placeholders_in_login_are_not_substituted() {
        let svg = generate_svg_badge(&contributor("{score}{place}", 3), Some(2));
        assert!(svg.contains("@{score}{place}"));
        assert!(svg.contains("BRONZE · 30 pts · #2"));
    }
}
