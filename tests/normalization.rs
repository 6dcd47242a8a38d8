use cvpress::dom::Region;
use cvpress::style::{collect_stylesheets, normalize, NormalizedDom, NormalizedNode};
use cvpress::CaptureConfig;

fn normalized(html: &str, selector: &str) -> NormalizedDom {
    let snapshot = Region::new(html, selector).snapshot().expect("capture");
    let sheets = collect_stylesheets(&snapshot, &CaptureConfig::default()).expect("stylesheets");
    normalize(&snapshot, &sheets)
}

fn by_tag<'a>(dom: &'a NormalizedDom, tag: &str) -> &'a NormalizedNode {
    dom.nodes
        .iter()
        .find(|n| n.tag == tag)
        .unwrap_or_else(|| panic!("no <{}> in region", tag))
}

#[test]
fn inline_style_block_resolves_colors() {
    let dom = normalized(
        "<html><head><style>h1 { color: #9ca3af; }</style></head>\
         <body><div id=\"r\"><h1>Name</h1></div></body></html>",
        "#r",
    );
    assert_eq!(by_tag(&dom, "h1").color.to_hex(), "#9ca3af");
}

#[test]
fn id_beats_class_beats_tag() {
    let dom = normalized(
        "<html><head><style>\
         p { color: #111111; }\
         .muted { color: #222222; }\
         #special { color: #333333; }\
         </style></head>\
         <body><div id=\"r\">\
         <p>plain</p>\
         <p class=\"muted\">classed</p>\
         <p id=\"special\" class=\"muted\">id</p>\
         </div></body></html>",
        "#r",
    );
    let paragraphs: Vec<_> = dom.nodes.iter().filter(|n| n.tag == "p").collect();
    assert_eq!(paragraphs[0].color.to_hex(), "#111111");
    assert_eq!(paragraphs[1].color.to_hex(), "#222222");
    assert_eq!(paragraphs[2].color.to_hex(), "#333333");
}

#[test]
fn later_rule_wins_at_equal_specificity() {
    let dom = normalized(
        "<html><head><style>p { color: #111111; } p { color: #444444; }</style></head>\
         <body><div id=\"r\"><p>x</p></div></body></html>",
        "#r",
    );
    assert_eq!(by_tag(&dom, "p").color.to_hex(), "#444444");
}

#[test]
fn style_attribute_wins_over_stylesheets() {
    let dom = normalized(
        "<html><head><style>#special { color: #333333; }</style></head>\
         <body><div id=\"r\"><p id=\"special\" style=\"color: #555555\">x</p></div></body></html>",
        "#r",
    );
    assert_eq!(by_tag(&dom, "p").color.to_hex(), "#555555");
}

#[test]
fn color_inherits_but_background_does_not() {
    let dom = normalized(
        "<html><head><style>div { color: #6b7280; background-color: #f3f4f6; }</style></head>\
         <body><div id=\"r\"><span>child</span></div></body></html>",
        "#r",
    );
    let span = by_tag(&dom, "span");
    assert_eq!(span.color.to_hex(), "#6b7280");
    assert!(span.background.is_none());
}

#[test]
fn border_defaults_to_current_color() {
    let dom = normalized(
        "<html><head><style>p { color: #3b82f6; }</style></head>\
         <body><div id=\"r\"><p>x</p></div></body></html>",
        "#r",
    );
    let p = by_tag(&dom, "p");
    assert_eq!(p.border, p.color);
}

#[test]
fn normalization_writes_direct_style_attributes() {
    let dom = normalized(
        "<html><head><style>p { color: #FF0000; background-color: #00FF00; }</style></head>\
         <body><div id=\"r\"><p>x</p></div></body></html>",
        "#r",
    );
    let p = by_tag(&dom, "p");
    let style = p
        .attrs
        .iter()
        .find(|(k, _)| k == "style")
        .map(|(_, v)| v.as_str())
        .expect("rewritten style attribute");
    // Values are canonical lowercase hex, never the authored form
    assert!(style.contains("color:#ff0000"), "style was {}", style);
    assert!(style.contains("background-color:#00ff00"), "style was {}", style);
}

#[test]
fn body_color_crosses_the_region_boundary() {
    let dom = normalized(
        "<html><head><style>body { color: #111827; } h1 { color: #9ca3af; }</style></head>\
         <body><div id=\"r\"><h1>Name</h1><p>summary</p></div></body></html>",
        "#r",
    );
    // The region root and unstyled descendants inherit the page color;
    // elements with their own rule keep it.
    assert_eq!(dom.nodes[0].color.to_hex(), "#111827");
    assert_eq!(by_tag(&dom, "p").color.to_hex(), "#111827");
    assert_eq!(by_tag(&dom, "h1").color.to_hex(), "#9ca3af");
}

#[test]
fn unstyled_region_falls_back_to_black_on_white() {
    let dom = normalized(
        "<html><body><div id=\"r\"><p>x</p></div></body></html>",
        "#r",
    );
    let p = by_tag(&dom, "p");
    assert_eq!(p.color.to_hex(), "#000000");
    assert!(p.background.is_none());
}

#[cfg(feature = "remote")]
#[test]
fn linked_stylesheet_is_fetched_and_applied() {
    // Skip on CI where opening local listeners may be restricted
    if std::env::var("CI").is_ok() {
        return;
    }
    use tiny_http::Server;

    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr();
    std::thread::spawn(move || {
        while let Ok(request) = server.recv() {
            let response = tiny_http::Response::from_string("h1 { color: #9ca3af; }");
            let _ = request.respond(response);
        }
    });

    let html = format!(
        "<html><head><link rel=\"stylesheet\" href=\"http://{}/theme.css\"></head>\
         <body><div id=\"r\"><h1>Name</h1></div></body></html>",
        addr
    );
    let dom = normalized(&html, "#r");
    assert_eq!(by_tag(&dom, "h1").color.to_hex(), "#9ca3af");
}
