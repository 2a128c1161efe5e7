use super::*;
use crate::layout::{LayoutContext, Role};
use crate::slide::{outline_text, PLACEHOLDER_TITLE};
use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

const SIX_SLIDE_OUTLINE: &str = "\
Slide 1: Title Slide
- Title: Intro to AI
- Subtitle: A primer
- Author: Jane Doe
- Date: Jan 1, 2025

Slide 2: What is AI?
- **Machine Learning**: systems that learn from data
- **Reasoning**: drawing conclusions

Slide 3: Questions to Consider
- How will AI change work?

Slide 4: Summary / Key Takeaways
- Key Point 1: AI is broad
- Key Point 2: ML is a subset

Slide 5: Timeline of AI
- 1956: Dartmouth workshop
- 2012: Deep learning breakthrough

Slide 6: Thank You
- Thank you for your attention
";

fn create_temp_text_file(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content.as_bytes()).expect("Failed to write to temp file");
    file
}

fn context<'a>(profile: &'a TierProfile, images: &'a ImageLibrary) -> LayoutContext<'a> {
    LayoutContext {
        profile,
        images,
        default_author: "Default Author",
        default_date: "January 1, 2025",
    }
}

#[test]
fn test_classify_examples() {
    assert_eq!(classify("Project Timeline"), SlideKind::Timeline);
    assert_eq!(classify("Summary of Findings"), SlideKind::Summary);
    assert_eq!(classify("Process Flow"), SlideKind::Flow);
    assert_eq!(classify("Questions to Consider"), SlideKind::Question);
    assert_eq!(classify("Rust vs Go"), SlideKind::Comparison);
    assert_eq!(classify("Key Differences"), SlideKind::Comparison);
    assert_eq!(classify("Thank You!"), SlideKind::Closing);
    assert_eq!(classify("Introduction"), SlideKind::Normal);
}

#[test]
fn test_classify_common_headings() {
    assert_eq!(classify("Summary / Key Takeaways"), SlideKind::Summary);
    assert_eq!(classify("Timeline of Events"), SlideKind::Timeline);
    assert_eq!(classify("ML vs DL"), SlideKind::Comparison);
    assert_eq!(classify("Thank You"), SlideKind::Closing);
    assert_eq!(classify("Random Topic"), SlideKind::Normal);
}

#[test]
fn test_classify_precedence_and_case() {
    // summary beats timeline
    assert_eq!(classify("TIMELINE SUMMARY"), SlideKind::Summary);
    assert_eq!(classify("flow of questions"), SlideKind::Flow);
    assert_eq!(classify(""), SlideKind::Normal);
}

#[test]
fn test_tokenize_bold_then_plain() {
    assert_eq!(
        tokenize("**Bold** and plain"),
        vec![EmphasisRun::emphasized("Bold"), EmphasisRun::plain(" and plain")]
    );
}

#[test]
fn test_tokenize_rules_drop_delimiters() {
    let text = "a **b** c **d";
    for rule in [EmphasisRule::Paired, EmphasisRule::Toggle, EmphasisRule::Plain] {
        let runs = rule.tokenize(text);
        let joined = emphasis::plain_text(&runs);
        assert!(!joined.contains("**"), "{:?} left delimiters in {:?}", rule, joined);
        assert_eq!(joined, "a b c d");
    }
}

#[test]
fn test_tokenize_unmatched_delimiter_emphasizes_rest() {
    assert_eq!(
        EmphasisRule::Paired.tokenize("plain **open"),
        vec![EmphasisRun::plain("plain "), EmphasisRun::emphasized("open")]
    );
    assert_eq!(
        EmphasisRule::Toggle.tokenize("plain **open"),
        vec![EmphasisRun::plain("plain "), EmphasisRun::emphasized("open")]
    );
}

#[test]
fn test_tokenize_plain_rule_never_emphasizes() {
    let runs = EmphasisRule::Plain.tokenize("**all** of **it**");
    assert_eq!(runs, vec![EmphasisRun::plain("all of it")]);
}

#[test]
fn test_parse_six_headers_gives_six_slides() {
    let slides = parse(SIX_SLIDE_OUTLINE).expect("outline parses");
    assert_eq!(slides.len(), 6);

    let kinds: Vec<SlideKind> = slides.iter().map(|s| s.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            SlideKind::Title,
            SlideKind::Normal,
            SlideKind::Question,
            SlideKind::Summary,
            SlideKind::Timeline,
            SlideKind::Closing,
        ]
    );
}

#[test]
fn test_parse_title_slide_fields() {
    let slides = parse(SIX_SLIDE_OUTLINE).unwrap();
    let title = &slides[0];
    assert_eq!(title.kind(), SlideKind::Title);
    assert_eq!(title.title(), "Intro to AI");
    assert_eq!(title.heading(), "Title Slide");
    assert_eq!(title.subtitle(), Some("A primer"));
    assert_eq!(title.author(), Some("Jane Doe"));
    assert_eq!(title.date(), Some("Jan 1, 2025"));
    assert_eq!(title.tagline(), None);
    assert!(title.bullets().is_empty());
}

#[test]
fn test_first_slide_is_title_even_when_heading_matches_a_keyword() {
    let slides = parse("Slide 1: Summary of the year\n- a point\nSlide 2: Next\n- b").unwrap();
    assert_eq!(slides[0].kind(), SlideKind::Title);
    assert_eq!(slides[1].kind(), SlideKind::Normal);
}

#[test]
fn test_title_field_does_not_reclassify() {
    let slides = parse("Slide 1: Intro\nSlide 2: Overview\n- Title: Project Timeline\n- a").unwrap();
    assert_eq!(slides[1].kind(), SlideKind::Normal);
    assert_eq!(slides[1].title(), "Project Timeline");
}

#[test]
fn test_parse_is_case_insensitive_and_ignores_noise() {
    let text = "Here is your deck:\n\nSLIDE 1: Intro\n- SUBTITLE: Sub\nrandom prose\n* star bullet\n- real bullet";
    let slides = parse(text).unwrap();
    assert_eq!(slides.len(), 1);
    assert_eq!(slides[0].subtitle(), Some("Sub"));
    assert_eq!(slides[0].bullets(), &["real bullet".to_string()]);
}

#[test]
fn test_empty_header_gets_placeholder_title() {
    let slides = parse("Slide 1:\n- a").unwrap();
    assert_eq!(slides[0].title(), PLACEHOLDER_TITLE);
}

#[test]
fn test_zero_headers_is_empty() {
    assert!(parse("").unwrap().is_empty());
    assert!(parse("just some prose\nwith no structure").unwrap().is_empty());
}

#[test]
fn test_reject_policy_reports_line_number() {
    let parser = OutlineParser::new(RecoveryPolicy::Reject);
    let err = parser.parse("\n- stray bullet\nSlide 1: Intro").unwrap_err();
    match err {
        DeckError::MalformedOutline { line_number, line } => {
            assert_eq!(line_number, 2);
            assert_eq!(line, "- stray bullet");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_synthesize_policy_opens_title_slide() {
    let slides = OutlineParser::new(RecoveryPolicy::Synthesize)
        .parse("- Author: Sam\n- first bullet\nSlide 2: Body\n- b")
        .unwrap();
    assert_eq!(slides.len(), 2);
    assert_eq!(slides[0].kind(), SlideKind::Title);
    assert_eq!(slides[0].title(), PLACEHOLDER_TITLE);
    assert_eq!(slides[0].author(), Some("Sam"));
    assert_eq!(slides[0].bullets(), &["first bullet".to_string()]);
}

#[test]
fn test_round_trip_through_outline_text() {
    let slides = parse(SIX_SLIDE_OUTLINE).unwrap();
    let reparsed = parse(&outline_text(&slides)).unwrap();
    assert_eq!(slides, reparsed);
}

#[test]
fn test_round_trip_of_built_slides() {
    let slides = vec![
        Slide::title_slide("Deck").with_tagline("Go further").with_date("today"),
        Slide::new("Rust vs Go").with_bullets(["Speed: both fast", "Safety: Rust wins"]),
        Slide::new("").with_bullet("orphan"),
    ];
    assert_eq!(parse(&outline_text(&slides)).unwrap(), slides);
}

#[test]
fn test_round_trip_keeps_loosely_spaced_field_lines() {
    let slides = parse("Slide 1: Deck\nSlide 2: Body\n-  Title: weird bullet\n- plain").unwrap();
    assert_eq!(slides[1].title(), "weird bullet");
    assert_eq!(slides[1].bullets(), &["plain".to_string()]);
    assert_eq!(parse(&outline_text(&slides)).unwrap(), slides);
}

#[test]
fn test_fallback_slides() {
    let slides = parser::fallback_slides("Rust", "some prose\n\nmore prose");
    assert_eq!(slides.len(), 2);
    assert_eq!(slides[0].kind(), SlideKind::Title);
    assert_eq!(slides[0].title(), "Rust");
    assert_eq!(slides[1].bullets(), &["some prose".to_string(), "more prose".to_string()]);

    let bare = parser::fallback_slides("  ", "");
    assert_eq!(bare.len(), 1);
    assert_eq!(bare[0].title(), PLACEHOLDER_TITLE);
}

#[test]
fn test_comparison_term_explanation_split() {
    let images = ImageLibrary::new();
    let ctx = context(Tier::Platinum.profile(), &images);
    let slide = Slide::new("Rust vs Go").with_bullet("**Aspect 1: Memory**: ownership vs GC");
    let rendered = render(&slide, 1, &ctx);

    assert_eq!(rendered.kind, SlideKind::Comparison);
    let body = rendered.text_box(Role::Body).expect("body box");
    assert_eq!(body.paragraphs.len(), 2);
    assert_eq!(body.paragraphs[0].text(), "Memory:");
    assert!(body.paragraphs[0].is_bold());
    assert_eq!(body.paragraphs[1].text(), "ownership vs GC");
    assert_eq!(body.paragraphs[1].level, 1);
}

#[test]
fn test_timeline_label_and_detail() {
    let images = ImageLibrary::new();
    let ctx = context(Tier::Platinum.profile(), &images);
    let slide = Slide::new("Project Timeline").with_bullets(["2020: Launch", "No colon here"]);
    let rendered = render(&slide, 2, &ctx);

    assert_eq!(rendered.kind, SlideKind::Timeline);
    let body = rendered.text_box(Role::Body).unwrap();
    let texts: Vec<String> = body.paragraphs.iter().map(|p| p.text()).collect();
    assert_eq!(texts, vec!["2020:", "Launch", "No colon here"]);
    assert!(body.paragraphs[0].is_bold());
    assert_eq!(body.paragraphs[0].level, 0);
    assert_eq!(body.paragraphs[1].level, 1);
    assert_eq!(body.paragraphs[2].level, 0);
}

#[test]
fn test_colonless_bullet_stays_at_top_level() {
    let images = ImageLibrary::new();
    let ctx = context(Tier::Gold.profile(), &images);
    let rendered = render(&Slide::new("Basics").with_bullet("Just a **plain** point"), 1, &ctx);
    let body = rendered.text_box(Role::Body).unwrap();

    assert_eq!(body.paragraphs.len(), 1);
    assert_eq!(body.paragraphs[0].text(), "Just a plain point");
    assert_eq!(body.paragraphs[0].level, 0);
}

#[test]
fn test_closing_slide_ignores_bullets() {
    let images = ImageLibrary::new();
    let ctx = context(Tier::Platinum.profile(), &images);
    let slide = Slide::new("Thank You").with_bullets(["Contact me", "See you soon"]);
    let rendered = render(&slide, 4, &ctx);

    assert_eq!(rendered.kind, SlideKind::Closing);
    let texts: Vec<String> = rendered
        .elements
        .iter()
        .filter_map(|e| match e {
            layout::Element::Text(b) => Some(b),
            _ => None,
        })
        .flat_map(|b| b.paragraphs.iter().map(|p| p.text()))
        .collect();
    assert_eq!(texts, vec!["Thank You", "We appreciate your time and attention"]);
}

#[test]
fn test_summary_layout_strips_key_point_prefix() {
    let images = ImageLibrary::new();
    let ctx = context(Tier::Platinum.profile(), &images);
    let slide = Slide::new("Summary").with_bullets(["**Key Point 1**: Ship it", "Plain point"]);
    let body = render(&slide, 3, &ctx);
    let body = body.text_box(Role::Body).unwrap();

    let texts: Vec<String> = body.paragraphs.iter().map(|p| p.text()).collect();
    assert_eq!(texts, vec!["Summary Points:", "Ship it", "Plain point"]);
}

#[test]
fn test_gold_splits_bullet_heading() {
    let images = ImageLibrary::new();
    let ctx = context(Tier::Gold.profile(), &images);
    let slide = Slide::new("Basics").with_bullet("**ML**: learns **from** data");
    let rendered = render(&slide, 1, &ctx);
    let body = rendered.text_box(Role::Body).unwrap();

    assert_eq!(body.paragraphs[0].text(), "ML:");
    assert!(body.paragraphs[0].is_bold());
    assert_eq!(body.paragraphs[1].text(), "learns from data");
    assert_eq!(body.paragraphs[1].runs.iter().filter(|r| r.style.bold).count(), 1);
}

#[test]
fn test_silver_renders_special_kinds_as_normal() {
    let images = ImageLibrary::new();
    let ctx = context(Tier::Silver.profile(), &images);
    for heading in ["Summary", "Timeline", "Process Flow", "Questions", "A vs B"] {
        let rendered = render(&Slide::new(heading).with_bullet("**x**: y"), 2, &ctx);
        assert_eq!(rendered.kind, SlideKind::Normal, "{}", heading);
        let body = rendered.text_box(Role::Body).unwrap();
        assert_eq!(body.paragraphs[0].text(), "x: y");
        assert!(!body.paragraphs[0].is_bold());
    }
}

#[test]
fn test_title_slide_uses_defaults_for_missing_author_and_date() {
    let images = ImageLibrary::new();
    let ctx = context(Tier::Gold.profile(), &images);
    let rendered = render(&Slide::title_slide("Deck"), 0, &ctx);
    let meta = rendered.text_box(Role::Meta).unwrap();
    assert_eq!(meta.paragraphs[0].text(), "Author: Default Author");
    assert_eq!(meta.paragraphs[1].text(), "Date: January 1, 2025");
    assert!(rendered.text_box(Role::Subtitle).is_none());
}

#[test]
fn test_flow_and_question_glyphs() {
    let images = ImageLibrary::new();
    let ctx = context(Tier::Platinum.profile(), &images);

    let flow = render(&Slide::new("Process Flow").with_bullets(["Plan", "Build", "Ship"]), 1, &ctx);
    let texts: Vec<String> = flow.text_box(Role::Body).unwrap().paragraphs.iter().map(|p| p.text()).collect();
    assert_eq!(texts, vec!["→ Plan", "→ Build", "⏹ Ship"]);

    let questions = render(&Slide::new("Questions").with_bullet("Why?"), 1, &ctx);
    assert_eq!(questions.text_box(Role::Body).unwrap().paragraphs[0].text(), "❓ Why?");
}

#[test]
fn test_assembler_appends_exactly_one_closing_slide() {
    let dir = TempDir::new().unwrap();
    let assembler = DeckAssembler::new(Tier::Platinum.profile(), DeckOptions::new(dir.path()));

    let slides = parse("Slide 1: Deck\nSlide 2: Body\n- a").unwrap();
    let rendered = assembler.render(&slides).unwrap();
    assert_eq!(rendered.len(), 3);
    assert_eq!(rendered[2].kind, SlideKind::Closing);

    let twice = parse("Slide 1: Deck\nSlide 2: Thank You\nSlide 3: Thank you again\n- bye").unwrap();
    let rendered = assembler.render(&twice).unwrap();
    let closing = rendered.iter().filter(|r| r.kind == SlideKind::Closing).count();
    assert_eq!(closing, 1);
    assert_eq!(rendered.len(), 3);
    assert_eq!(rendered[2].kind, SlideKind::Normal);
}

#[test]
fn test_assembler_rejects_empty_outline() {
    let dir = TempDir::new().unwrap();
    let assembler = DeckAssembler::new(Tier::Gold.profile(), DeckOptions::new(dir.path()));
    assert!(matches!(assembler.render(&[]), Err(DeckError::EmptyOutline)));
}

#[test]
fn test_assemble_writes_deck_with_preview() {
    let dir = TempDir::new().unwrap();
    let options = DeckOptions::new(dir.path()).with_naming(NamingPolicy::Overwrite);
    let output = DeckAssembler::new(Tier::Gold.profile(), options)
        .assemble(&parse(SIX_SLIDE_OUTLINE).unwrap())
        .unwrap();

    assert_eq!(output.path, dir.path().join("Intro_to_AI.pptx"));
    assert!(output.path.exists());
    assert_eq!(output.slide_count(), 6);
    assert_eq!(
        output.preview,
        vec![
            "Machine Learning: systems that learn from data".to_string(),
            "Reasoning: drawing conclusions".to_string(),
        ]
    );
}

#[test]
fn test_sanitize_filename() {
    assert_eq!(utils::sanitize_filename("Intro to AI"), "Intro_to_AI");
    assert_eq!(utils::sanitize_filename("  Rust: a **guide**!  "), "Rust_a_guide");
    assert_eq!(utils::sanitize_filename("../../etc/passwd"), "etcpasswd");
    assert_eq!(utils::sanitize_filename("???"), "presentation");
    assert_eq!(utils::sanitize_filename(&"x".repeat(200)).len(), 80);
}

#[test]
fn test_naming_policies() {
    assert_eq!(NamingPolicy::Overwrite.file_name("My Deck"), "My_Deck.pptx");

    let stamped = NamingPolicy::Timestamped.file_name("My Deck");
    assert!(stamped.starts_with("My_Deck-"));
    assert!(stamped.ends_with(".pptx"));
    assert_ne!(stamped, NamingPolicy::Timestamped.file_name("My Deck"));

    let by_id = NamingPolicy::RequestId.file_name("My Deck");
    assert_eq!(by_id.len(), "My_Deck-".len() + 36 + ".pptx".len());

    assert_eq!("request_id".parse::<NamingPolicy>().unwrap(), NamingPolicy::RequestId);
    assert!("sometimes".parse::<NamingPolicy>().is_err());
}

#[test]
fn test_limit_words() {
    let (text, warning) = limit_words("one two three", 5);
    assert_eq!(text, "one two three");
    assert!(warning.is_none());

    let (text, warning) = limit_words("one two\nthree four", 3);
    assert_eq!(text, "one two three");
    assert_eq!(
        warning.unwrap(),
        "⚠ Content exceeded 3 words. Only the first 3 words were used for PPT generation."
    );
}

#[test]
fn test_extract_text_and_csv() {
    let txt = create_temp_text_file("hello\nworld", ".txt");
    assert_eq!(extract(txt.path()).unwrap(), "hello\nworld");

    let csv = create_temp_text_file("name,qty\napple,10\n\"kiwi, gold\",3\n", ".csv");
    assert_eq!(
        extract(csv.path()).unwrap(),
        "      name qty\n     apple  10\nkiwi, gold   3"
    );
}

#[test]
fn test_extract_unsupported_format_returns_sentinel() {
    let file = create_temp_text_file("binary", ".xyz");
    assert_eq!(extract(file.path()).unwrap(), "⚠ Unsupported file format: .xyz");
}

#[test]
fn test_extract_missing_file() {
    let result = extract(std::path::Path::new("/definitely/not/here.txt"));
    assert!(matches!(result, Err(DeckError::PathNotFoundError(_))));
}

#[test]
fn test_extract_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("b.txt"), "bee").unwrap();
    fs::write(dir.path().join("a.md"), "# ay").unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();

    let contents = extract_directory(dir.path()).unwrap();
    let names: Vec<&str> = contents.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["a.md", "b.txt"]);
    assert_eq!(contents["b.txt"], "bee");
}

#[test]
fn test_tier_parse_and_profiles() {
    assert_eq!("GOLD".parse::<Tier>().unwrap(), Tier::Gold);
    assert!("bronze".parse::<Tier>().is_err());
    assert_eq!(Tier::default(), Tier::Platinum);

    assert!(!Tier::Silver.profile().recognizes(SlideKind::Summary));
    assert!(Tier::Silver.profile().recognizes(SlideKind::Closing));
    assert!(Tier::Platinum.profile().recognizes(SlideKind::Comparison));
    assert_eq!(Tier::Silver.profile().word_limit, 500_000);
    assert_eq!(Tier::Gold.profile().word_limit, 750_000);
}

#[test]
fn test_pipeline_with_static_generator() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::new();
    config.output_dir = dir.path().to_path_buf();
    config.tier = Tier::Gold;

    let generator = StaticGenerator::new(SIX_SLIDE_OUTLINE);
    let source = create_temp_text_file("word ".repeat(10).as_str(), ".txt");
    let response = Pipeline::new(config, &generator)
        .run(ContentRequest::new("AI"), Some(source.path()))
        .unwrap();

    assert_eq!(response.slide_count, 6);
    assert!(response.warning.is_none());
    assert!(response.pptx_path.exists());
    assert_eq!(response.message, "Gold presentation generated successfully!");
}

#[test]
fn test_pipeline_falls_back_when_outline_has_no_headers() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::new();
    config.output_dir = dir.path().to_path_buf();

    let generator = StaticGenerator::new("I could not produce slides, sorry.");
    let response = Pipeline::new(config, &generator)
        .run(ContentRequest::new("Fallback Topic"), None)
        .unwrap();

    // title, overview, appended closing
    assert_eq!(response.slide_count, 3);
    assert_eq!(response.preview, vec!["I could not produce slides, sorry.".to_string()]);
    let name = response.pptx_path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("Fallback_Topic-"));
}

#[test]
fn test_write_pptx_without_slides_leaves_no_file() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("empty.pptx");

    let result = write_pptx(&[], &target, &PptxConfig::default());
    assert!(matches!(result, Err(DeckError::SerializationFailure(_))));
    assert!(!target.exists());
}

#[test]
fn test_write_pptx_into_a_file_path_fails() {
    let images = ImageLibrary::new();
    let ctx = context(Tier::Gold.profile(), &images);
    let slides = vec![render(&Slide::title_slide("Deck"), 0, &ctx)];

    let blocker = create_temp_text_file("not a directory", ".txt");
    let target = blocker.path().join("deck.pptx");

    let result = write_pptx(&slides, &target, &PptxConfig::default());
    assert!(matches!(
        result,
        Err(DeckError::ValidationError(_)) | Err(DeckError::SerializationFailure(_))
    ));
    assert!(!target.exists());
}

#[test]
fn test_build_from_outline_needs_no_generator() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::new();
    config.output_dir = dir.path().to_path_buf();
    config.tier = Tier::Platinum;
    config.naming = NamingPolicy::Overwrite;

    let response = build_from_outline(&config, SIX_SLIDE_OUTLINE).unwrap();
    assert_eq!(response.tier, Tier::Platinum);
    assert_eq!(response.pptx_path, dir.path().join("Intro_to_AI.pptx"));
    assert!(response.pptx_path.exists());
    assert!(response.warning.is_none());

    config.recovery = RecoveryPolicy::Reject;
    assert!(matches!(
        build_from_outline(&config, "- stray\nSlide 1: Intro"),
        Err(DeckError::MalformedOutline { line_number: 1, .. })
    ));
}
