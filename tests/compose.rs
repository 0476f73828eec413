// tests/compose.rs
use promo_bot::config::options::PostOptions;
use promo_bot::model::PromotionCandidate;
use promo_bot::publish::compose::{compose, fit_deal, Draft, Feature};

const URL: &str = "https://shop.canaries.co.uk/page/discountsandpromotions";
const TAG_LINE: &str = "#NCFC #Canaries #OTBC #NorwichCity";

fn chars(s: &str) -> usize {
    s.chars().count()
}

fn draft(headline: &str) -> Draft {
    compose(&PromotionCandidate::headline(headline.to_string(), URL), &PostOptions::default())
}

/// Every facet must cover exactly the text it annotates.
fn assert_facets_line_up(d: &Draft) {
    for f in &d.facets {
        let span = &d.text[f.index.byte_start..f.index.byte_end];
        match &f.features[0] {
            Feature::Link { uri } => {
                assert_eq!(span, "View details here");
                assert_eq!(uri, &d.link);
            }
            Feature::Tag { tag } => assert_eq!(span, format!("#{tag}")),
        }
    }
}

#[test]
fn short_post_layout_and_facets() {
    let d = draft("40% Off Home Kit");
    assert_eq!(
        d.text,
        format!("🛍️ NCFC SHOP DEAL:\n\n40% Off Home Kit\n\nView details here\n\n{TAG_LINE}")
    );
    assert_eq!(d.deal, "40% Off Home Kit");
    assert_eq!(d.facets.len(), 5);
    assert_facets_line_up(&d);

    // Offsets are bytes: the emoji lead-in pushes them past the char index
    let link = &d.facets[0];
    assert!(link.index.byte_start > d.text[..link.index.byte_start].chars().count());
}

#[test]
fn long_deal_is_truncated_and_fixed_parts_survive() {
    let headline = "Massive clearance event ".repeat(30);
    let d = draft(headline.trim());

    assert!(chars(&d.text) <= 300, "{} chars", chars(&d.text));
    assert!(d.deal.ends_with('…'));
    assert!(d.text.starts_with("🛍️ NCFC SHOP DEAL:\n\n"));
    assert!(d.text.ends_with(&format!("\n\nView details here\n\n{TAG_LINE}")));
    assert!(d.text.contains(&format!("{}\n\n", d.deal)));
    // Title keeps the full headline for the link-card
    assert_eq!(d.title, headline.trim());
    assert_facets_line_up(&d);
}

#[test]
fn deal_that_exactly_fits_is_untouched() {
    let overhead = chars(&draft("").text);
    let budget = 300 - overhead;
    let headline = "s".repeat(budget);
    let d = draft(&headline);
    assert_eq!(d.deal, headline);
    assert_eq!(chars(&d.text), 300);

    let over = draft(&"s".repeat(budget + 1));
    assert_eq!(chars(&over.text), 300);
    assert!(over.deal.ends_with('…'));
}

#[test]
fn tight_limit_drops_tags_before_breaking_the_template() {
    let mut opts = PostOptions::default();
    opts.char_limit = 60;
    let c = PromotionCandidate::headline("Half price on all retro shirts".into(), URL);
    let d = compose(&c, &opts);
    assert!(chars(&d.text) <= 60);
    assert!(d.text.ends_with("#NCFC #Canaries"));
    assert!(!d.text.contains("#OTBC"));
    assert!(d.deal.ends_with('…'));
    assert_facets_line_up(&d);
}

#[test]
fn oversized_template_is_flagged_not_hidden() {
    let mut opts = PostOptions::default();
    opts.char_limit = 20;
    let c = PromotionCandidate::headline("Half price on all retro shirts".into(), URL);
    let d = compose(&c, &opts);

    assert_eq!(d.deal, "");
    assert!(!d.text.contains('#'));
    assert_eq!(d.overflow, chars(&d.text) - 20);
    assert!(d.overflow > 0);
    assert_facets_line_up(&d);

    assert_eq!(draft("40% Off Home Kit").overflow, 0);
}

#[test]
fn fit_deal_cases() {
    assert_eq!(fit_deal("short", 10, "…"), "short");
    assert_eq!(fit_deal("abcdef ghij", 8, "…"), "abcdef…");
    assert_eq!(fit_deal("£££££", 3, "…"), "££…");
    assert_eq!(fit_deal("anything", 0, "…"), "");
}

#[test]
fn facets_serialize_as_richtext() {
    let d = draft("Free scarf with every shirt");
    let json = serde_json::to_value(&d.facets).unwrap();
    assert_eq!(json[0]["features"][0]["$type"], "app.bsky.richtext.facet#link");
    assert_eq!(json[0]["features"][0]["uri"], URL);
    assert!(json[0]["index"]["byteStart"].is_u64());
    assert_eq!(json[1]["features"][0]["$type"], "app.bsky.richtext.facet#tag");
    assert_eq!(json[1]["features"][0]["tag"], "NCFC");
}
