use editor::engine::{html, MemoryEngine, Position, RichTextEngine, Selection};
use editor::{
    apply_dimensions, extract_dimensions_from_css, AttributeField, Capabilities, ContentSynchronizer, EditorSession,
    FieldState, FormattingToggle, PageDimensions, Role, Session, SurfaceMode,
};
use store::FolioConfig;

fn editor_session(markup: &str, engine: MemoryEngine) -> EditorSession<MemoryEngine> {
    EditorSession::new(engine, &Session::guest(Some(Role::Editor)), &FolioConfig::default(), markup).unwrap()
}

fn select_block(session: &mut EditorSession<MemoryEngine>, block: usize) {
    let len = session.engine().blocks()[block].char_len();
    session
        .engine_mut()
        .set_selection(Selection::range(Position::new(block, 0), Position::new(block, len)));
}

#[test]
fn red_text_stays_red_through_italic_then_bold() {
    let mut session = editor_session(
        "<p><span style=\"color: #ff0000\">warning</span></p>",
        MemoryEngine::new().with_color_reset(),
    );
    select_block(&mut session, 0);

    session.apply(FormattingToggle::Italic);
    session.apply(FormattingToggle::Bold);

    assert_eq!(
        session.content(),
        "<p><span style=\"color: #ff0000\"><strong><em>warning</em></strong></span></p>"
    );
    assert_eq!(session.attributes().get().font_color, "#ff0000");
}

#[test]
fn color_survives_list_toggle() {
    let mut session = editor_session(
        "<p><span style=\"color: #00aa00\">item</span></p>",
        MemoryEngine::new().with_color_reset(),
    );
    select_block(&mut session, 0);
    session.apply(FormattingToggle::BulletList);
    assert_eq!(
        session.content(),
        "<ul><li><p><span style=\"color: #00aa00\">item</span></p></li></ul>"
    );
}

#[test]
fn mixed_colors_stay_ambiguous_until_set() {
    let mut session = editor_session(
        "<p><span style=\"color: #ff0000\">red</span><span style=\"color: #00ff00\">green</span></p>",
        MemoryEngine::new().with_color_reset(),
    );
    select_block(&mut session, 0);
    assert_eq!(session.attributes().field(AttributeField::FontColor), FieldState::Ambiguous);

    // Each stretch keeps its own color through the toggle
    session.apply(FormattingToggle::Bold);
    assert_eq!(session.attributes().field(AttributeField::FontColor), FieldState::Ambiguous);
    assert_eq!(
        session.content(),
        "<p><span style=\"color: #ff0000\"><strong>red</strong></span>\
         <span style=\"color: #00ff00\"><strong>green</strong></span></p>"
    );

    session.set_color("#00ff00");
    assert_eq!(session.attributes().field(AttributeField::FontColor), FieldState::Known("#00ff00"));
}

#[test]
fn last_chosen_color_wins_over_bold_toggles() {
    let mut session = editor_session("<p>some text</p>", MemoryEngine::new().with_color_reset());
    let colors = ["#ff0000", "#000000", "#00aa00", "#123456"];
    let mut chosen = "#000000";

    for step in 0..24 {
        select_block(&mut session, 0);
        if step % 3 != 2 {
            chosen = colors[step % colors.len()];
            session.set_color(chosen);
        }
        session.apply(FormattingToggle::Bold);

        // Text without an inline color renders in the default black
        let reading = session.engine().selection_attributes().color;
        let shown = reading.uniform().map(String::as_str).unwrap_or("#000000");
        assert_eq!(shown, chosen, "step {step}");
        assert_eq!(session.attributes().get().font_color, chosen, "step {step}");
    }
}

#[test]
fn configured_indent_above_ten_is_capped() {
    let config = FolioConfig::from_toml("[editing]\nmax_indent = 40").unwrap();
    let mut session =
        EditorSession::new(MemoryEngine::new(), &Session::guest(Some(Role::Editor)), &config, "<p>deep</p>").unwrap();
    session.engine_mut().set_selection(Selection::caret(Position::new(0, 1)));
    for _ in 0..30 {
        session.apply(FormattingToggle::Indent);
    }
    assert_eq!(session.engine().blocks()[0].attrs.indent, 10);
}

#[test]
fn indent_never_leaves_bounds() {
    let mut session = editor_session("<p>para</p><ul><li><p>item</p></li></ul>", MemoryEngine::new());
    session
        .engine_mut()
        .set_selection(Selection::range(Position::new(0, 0), Position::new(1, 2)));

    for _ in 0..25 {
        session.apply(FormattingToggle::Indent);
    }
    // Only the block type at the head is shifted
    assert_eq!(session.engine().blocks()[1].attrs.indent, 10);
    assert_eq!(session.engine().blocks()[0].attrs.indent, 0);

    for _ in 0..25 {
        session.apply(FormattingToggle::Outdent);
    }
    assert_eq!(session.engine().blocks()[1].attrs.indent, 0);
}

#[test]
fn render_twice_is_identical() {
    let mut session = editor_session("<p>a</p>", MemoryEngine::new());
    select_block(&mut session, 0);
    session.apply(FormattingToggle::Bold);

    let content = session.content();
    let once = ContentSynchronizer::render(&content, SurfaceMode::Static);
    let twice = ContentSynchronizer::render(&content, SurfaceMode::Static);
    assert_eq!(once, twice);
    assert_eq!(once.markup(), content);
}

#[test]
fn role_gate_is_total() {
    for name in ["editor", "designer", "admin", "", "guest", "EDITOR", "root"] {
        assert_eq!(Capabilities::resolve_name(name), Capabilities::resolve_name(name));
    }
    let unknown = Capabilities::resolve_name("root");
    assert!(!unknown.can_edit);
    assert!(!unknown.can_manage_templates);
    assert!(!unknown.can_manage_styles);
    assert!(Capabilities::resolve_name("EDITOR").can_edit);
}

#[test]
fn dimensions_roundtrip_exactly() {
    let styles = apply_dimensions(".template-styled p { margin: 0; }\n", "6in", "9in");
    assert_eq!(extract_dimensions_from_css(&styles), Some(PageDimensions::new("6in", "9in")));
}

#[test]
fn engine_markup_reparses_to_same_document() {
    let mut engine = MemoryEngine::from_markup(
        "<p data-indent=\"2\">a <em>b</em></p><ol><li><p><span style=\"font-size: 20px\">c</span></p></li></ol>",
    );
    engine.select_all();
    engine.toggle_mark(editor::engine::MarkKind::Bold);
    let markup = engine.serialize();
    assert_eq!(html::parse(&markup), engine.blocks());
}

#[test]
fn formatting_without_selection_changes_nothing() {
    let mut session = editor_session("<p>text</p>", MemoryEngine::new());
    for toggle in FormattingToggle::ALL {
        session.apply(toggle);
    }
    assert_eq!(session.content(), "<p>text</p>");
    assert!(!session.is_dirty());
}
