use super::*;
use serde_json::json;

fn data(value: Value) -> ComponentData {
    value.as_object().cloned().unwrap_or_default()
}

#[test]
fn hero_reads_fields() {
    let block = hero(&data(json!({
        "title": "Build faster",
        "subtitle": "Tools for teams",
        "image_url": "/img/hero.png",
        "cta_label": "Start",
        "cta_href": "/start"
    })));
    assert_eq!(
        block,
        Block::Hero {
            title: "Build faster".into(),
            subtitle: Some("Tools for teams".into()),
            image_url: Some("/img/hero.png".into()),
            cta: Some(Link { label: "Start".into(), href: "/start".into() }),
        }
    );
}

#[test]
fn hero_tolerates_missing_and_ill_typed_fields() {
    let block = hero(&data(json!({"title": ["not", "text"], "subtitle": "  ", "cta_label": "Go"})));
    assert_eq!(block, Block::Hero { title: "Untitled".into(), subtitle: None, image_url: None, cta: None });
}

#[test]
fn numbers_render_as_text() {
    let block = call_to_action(&data(json!({"heading": 42})));
    assert!(matches!(block, Block::CallToAction { heading, .. } if heading == "42"));
}

#[test]
fn tool_cards_skip_invalid_entries() {
    let block = popular_tools(&data(json!({
        "tools": [
            {"name": "Resizer", "slug": "resizer", "icon": "R"},
            "junk",
            {"description": "no title"},
            {"title": "Converter", "href": "https://example.com/convert"}
        ]
    })));
    let Block::PopularTools { heading, tools } = block else {
        panic!("expected popular tools");
    };
    assert_eq!(heading, "Popular tools");
    assert_eq!(tools.len(), 2);
    assert_eq!(tools[0].href.as_deref(), Some("/resizer"));
    assert_eq!(tools[0].icon.as_deref(), Some("R"));
    assert_eq!(tools[1].title, "Converter");
    assert_eq!(tools[1].href.as_deref(), Some("https://example.com/convert"));
}

#[test]
fn category_grid_with_non_array_is_empty() {
    let block = category_grid(&data(json!({"heading": "Browse", "categories": {"a": 1}})));
    assert_eq!(block, Block::CategoryGrid { heading: "Browse".into(), categories: vec![] });
}

#[test]
fn rich_text_renders_markdown_and_drops_raw_html() {
    let block = rich_text(&data(json!({"body": "# Title\n\n<script>alert(1)</script>\n\n**bold**"})));
    let Block::RichText { html } = block else {
        panic!("expected rich text");
    };
    assert!(html.contains("<h1>Title</h1>"));
    assert!(html.contains("<strong>bold</strong>"));
    assert!(!html.contains("<script>"));
}

#[test]
fn rich_text_without_body_is_empty() {
    assert_eq!(rich_text(&ComponentData::new()), Block::RichText { html: String::new() });
}

#[test]
fn faq_requires_question() {
    let block = faq(&data(json!({"items": [{"question": "Why?", "answer": "Because"}, {"answer": "orphan"}]})));
    let Block::Faq { items, .. } = block else {
        panic!("expected faq");
    };
    assert_eq!(items, vec![FaqItem { question: "Why?".into(), answer: "Because".into() }]);
}

#[test]
fn call_to_action_button_needs_label_and_href() {
    let with_button = call_to_action(&data(json!({"button_label": "Buy", "button_href": "/buy"})));
    assert!(matches!(with_button, Block::CallToAction { button: Some(_), .. }));

    let without = call_to_action(&data(json!({"button_label": "Buy"})));
    assert!(matches!(without, Block::CallToAction { button: None, .. }));
}

#[test]
fn safe_url_allows_web_and_relative_targets() {
    for url in ["https://a.test/x", "HTTP://a.test", "mailto:hi@a.test", "/start", "start", "#faq", "?q=1", "//cdn.test/a.png", "/a:b"] {
        assert!(is_safe_url(url), "{url}");
    }
}

#[test]
fn safe_url_rejects_script_and_data_schemes() {
    for url in ["javascript:alert(1)", " JavaScript:alert(1)", "java\tscript:alert(1)", "data:text/html,x", "vbscript:x"] {
        assert!(!is_safe_url(url), "{url}");
    }
}

#[test]
fn hero_drops_script_links_and_images() {
    let block = hero(&data(json!({
        "title": "T",
        "image_url": "javascript:alert(1)",
        "cta_label": "Go",
        "cta_href": "javascript:alert(1)"
    })));
    let Block::Hero { image_url, cta, .. } = block else {
        panic!("expected hero");
    };
    assert!(image_url.is_none());
    assert!(cta.is_none());
}

#[test]
fn cards_drop_script_hrefs() {
    let block = popular_tools(&data(json!({
        "tools": [{"name": "Evil", "href": "javascript:alert(1)"}, {"name": "Ok", "href": "https://ok.test"}]
    })));
    let Block::PopularTools { tools, .. } = block else {
        panic!("expected tools");
    };
    assert_eq!(tools[0].href, None);
    assert_eq!(tools[1].href.as_deref(), Some("https://ok.test"));
}

#[test]
fn markdown_blanks_script_links_and_images() {
    let html = markdown_to_html("[click](javascript:alert(document.cookie)) ![x](javascript:alert(1)) [ok](https://ok.test)");
    assert!(!html.contains("javascript:"), "{html}");
    assert!(html.contains(r#"href="https://ok.test""#));
}
