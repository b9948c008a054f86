use yarrow::{
    emit_document_to_string, emit_node_to_string, Atom, AtomStyle, Chomp, Comments, Document,
    DocumentState, EmitterConfig, Input, Mode, Node, Presentation, ScalarStyle, ScalarToken,
    TagDirective,
};

fn plain(text: &str) -> Node<'_> {
    Node::scalar(ScalarToken::new(text, ScalarStyle::Plain))
}

fn dump(doc: &Document<'_>) -> String {
    emit_document_to_string(doc, EmitterConfig::new()).unwrap()
}

#[test]
fn plain_scalar_document() {
    let doc = Document::new(plain("hello world"));
    assert_eq!(dump(&doc), "hello world\n");
}

#[test]
fn block_sequence() {
    let doc = Document::new(Node::sequence(vec![plain("1"), plain("2"), plain("3")]));
    assert_eq!(dump(&doc), "- 1\n- 2\n- 3\n");
}

#[test]
fn block_mapping() {
    let doc = Document::new(Node::mapping([
        (plain("a"), plain("1")),
        (plain("b"), plain("2")),
    ]));
    assert_eq!(dump(&doc), "a: 1\nb: 2\n");
}

#[test]
fn nested_mapping_indents() {
    let doc = Document::new(Node::mapping([
        (plain("a"), Node::mapping([(plain("b"), plain("1"))])),
        (plain("c"), plain("2")),
    ]));
    assert_eq!(dump(&doc), "a:\n  b: 1\nc: 2\n");
}

#[test]
fn sequence_under_mapping_is_indentless() {
    let doc = Document::new(Node::mapping([(
        plain("a"),
        Node::sequence(vec![plain("1"), plain("2")]),
    )]));
    assert_eq!(dump(&doc), "a:\n- 1\n- 2\n");
}

#[test]
fn mapping_in_sequence_is_compact() {
    let doc = Document::new(Node::sequence(vec![Node::mapping([(
        plain("a"),
        plain("1"),
    )])]));
    assert_eq!(dump(&doc), "- a: 1\n");
}

#[test]
fn empty_containers_render_flow() {
    assert_eq!(dump(&Document::new(Node::sequence(vec![]))), "[]\n");
    assert_eq!(dump(&Document::new(Node::mapping([]))), "{}\n");
}

#[test]
fn flow_container_in_block_mapping() {
    let doc = Document::new(Node::mapping([(
        plain("a"),
        Node::sequence(vec![plain("1"), plain("2")]).into_flow(),
    )]));
    assert_eq!(dump(&doc), "a: [\n    1,\n    2\n  ]\n");
}

#[test]
fn flow_oneline_sequence() {
    let doc = Document::new(Node::sequence(vec![plain("1"), plain("2"), plain("3")]));
    let out = emit_document_to_string(
        &doc,
        EmitterConfig::new().mode(Mode::FlowOneline),
    )
    .unwrap();
    assert_eq!(out, "[1, 2, 3]\n");
}

#[test]
fn json_oneline_mapping() {
    let node = Node::mapping([(plain("a"), plain("1")), (plain("b"), plain("2"))]);
    let out = emit_node_to_string(
        &node,
        EmitterConfig::new().mode(Mode::JsonOneline),
    )
    .unwrap();
    assert_eq!(out, "{\"a\": 1, \"b\": 2}");
}

#[test]
fn json_block_layout() {
    let doc = Document::new(Node::mapping([(plain("a"), plain("1"))]));
    let out = emit_document_to_string(&doc, EmitterConfig::new().mode(Mode::Json)).unwrap();
    assert_eq!(out, "{\n  \"a\": 1\n}\n");
}

#[test]
fn literal_scalar() {
    let doc = Document::new(Node::scalar(ScalarToken::new(
        "line1\nline2\n",
        ScalarStyle::Literal,
    )));
    assert_eq!(dump(&doc), "|\n  line1\n  line2\n");
}

#[test]
fn literal_scalar_strip_and_keep_indicators() {
    let strip = Document::new(Node::scalar(ScalarToken::new(
        "line1\nline2",
        ScalarStyle::Literal,
    )));
    assert_eq!(dump(&strip), "|-\n  line1\n  line2\n");

    let keep = Document::new(Node::scalar(ScalarToken::new(
        "line1\n\n",
        ScalarStyle::Literal,
    )));
    assert_eq!(dump(&keep), "|+\n  line1\n  \n");
}

#[test]
fn literal_with_leading_whitespace_gets_indent_digit() {
    let doc = Document::new(Node::mapping([(
        plain("a"),
        Node::scalar(ScalarToken::new("  x\n", ScalarStyle::Literal)),
    )]));
    assert_eq!(dump(&doc), "a: |2\n    x\n");
}

#[test]
fn literal_in_mapping_value() {
    let doc = Document::new(Node::mapping([(
        plain("a"),
        Node::scalar(ScalarToken::new("x\ny\n", ScalarStyle::Literal)),
    )]));
    assert_eq!(dump(&doc), "a: |\n  x\n  y\n");
}

#[test]
fn folded_scalar_roundtrips_atom_decode() {
    let input = Input::new("aaa\nbbb\n\nccc\n");
    let atom = Atom::over(&input, 0..input.len(), AtomStyle::Folded).with_chomp(Chomp::Clip);
    assert_eq!(atom.text().unwrap(), "aaa bbb\nccc\n");

    let doc = Document::new(Node::scalar(ScalarToken::new(
        atom.text().unwrap(),
        ScalarStyle::Folded,
    )));
    assert_eq!(dump(&doc), ">\n  aaa bbb\n\n  ccc\n");
}

#[test]
fn atom_backed_token_emits_decoded_text() {
    let input = Input::new("foo\nbar");
    let atom = Atom::over(&input, 0..input.len(), AtomStyle::Plain);
    let doc = Document::new(Node::scalar(ScalarToken::from_atom(atom)));
    assert_eq!(dump(&doc), "foo bar\n");
}

#[test]
fn double_quoted_escapes() {
    let node = Node::scalar(ScalarToken::new("\t\u{2028}", ScalarStyle::DoubleQuoted));
    assert_eq!(
        emit_node_to_string(&node, EmitterConfig::new()).unwrap(),
        "\"\\t\\L\""
    );

    let node = Node::scalar(ScalarToken::new("a\"b\\c\u{7}", ScalarStyle::DoubleQuoted));
    assert_eq!(
        emit_node_to_string(&node, EmitterConfig::new()).unwrap(),
        "\"a\\\"b\\\\c\\a\""
    );

    let node = Node::scalar(ScalarToken::new("\u{1f600}\u{fffe}", ScalarStyle::DoubleQuoted));
    assert_eq!(
        emit_node_to_string(&node, EmitterConfig::new()).unwrap(),
        "\"\u{1f600}\\uFFFE\""
    );
}

#[test]
fn single_quoted_doubles_quotes() {
    let node = Node::scalar(ScalarToken::new("it's", ScalarStyle::SingleQuoted));
    assert_eq!(
        emit_node_to_string(&node, EmitterConfig::new()).unwrap(),
        "'it''s'"
    );
}

#[test]
fn any_style_quotes_unsafe_scalars() {
    for (text, expected) in [
        ("plain text", "plain text\n"),
        ("true", "\"true\"\n"),
        ("12", "\"12\"\n"),
        ("", "\"\"\n"),
        ("a: b", "\"a: b\"\n"),
    ] {
        let doc = Document::new(Node::scalar(ScalarToken::new(text, ScalarStyle::Any)));
        assert_eq!(dump(&doc), expected, "text {text:?}");
    }
}

#[test]
fn complex_key_gets_question_mark() {
    let doc = Document::new(Node::mapping([(
        Node::scalar(ScalarToken::new("k1\nk2", ScalarStyle::Any)),
        plain("v"),
    )]));
    assert_eq!(dump(&doc), "? \"k1\\nk2\"\n: v\n");
}

#[test]
fn plain_scalar_folds_at_width() {
    let input = Input::new("aaa\nbbb");
    let atom = Atom::over(&input, 0..input.len(), AtomStyle::Plain);
    let doc = Document::new(Node::scalar(ScalarToken::from_atom(atom)));
    let out = emit_document_to_string(&doc, EmitterConfig::new().width(2)).unwrap();
    assert_eq!(out, "aaa\nbbb\n");
}

#[test]
fn anchors_and_tags_on_root_force_start_mark() {
    let doc = Document::new(plain("foo").with_anchor("a1"));
    assert_eq!(dump(&doc), "--- &a1 foo\n");

    let doc = Document::new(plain("foo").with_tag(yarrow::Tag::new("!!", "str")));
    assert_eq!(dump(&doc), "--- !!str foo\n");
}

#[test]
fn anchors_and_aliases_in_sequences() {
    let doc = Document::new(Node::sequence(vec![
        plain("v").with_anchor("x"),
        Node::alias("x"),
    ]));
    assert_eq!(dump(&doc), "- &x v\n- *x\n");
}

#[test]
fn alias_key_gets_space_before_colon() {
    let doc = Document::new(Node::mapping([(Node::alias("x"), plain("v"))]));
    assert_eq!(dump(&doc), "*x : v\n");
}

#[test]
fn strip_labels_and_tags() {
    let doc = Document::new(Node::sequence(vec![plain("v")
        .with_anchor("x")
        .with_tag(yarrow::Tag::new("!!", "str"))]));
    let out = emit_document_to_string(
        &doc,
        EmitterConfig::new().strip_labels(true).strip_tags(true),
    )
    .unwrap();
    assert_eq!(out, "- v\n");
}

#[test]
fn sort_keys_is_deterministic() {
    let forwards = Document::new(Node::mapping([
        (plain("b"), plain("2")),
        (plain("a"), plain("1")),
        (plain("c"), plain("3")),
    ]));
    let backwards = Document::new(Node::mapping([
        (plain("c"), plain("3")),
        (plain("a"), plain("1")),
        (plain("b"), plain("2")),
    ]));

    let cfg = EmitterConfig::new().sort_keys(true);
    let out1 = emit_document_to_string(&forwards, cfg).unwrap();
    let out2 = emit_document_to_string(&backwards, cfg).unwrap();
    assert_eq!(out1, "a: 1\nb: 2\nc: 3\n");
    assert_eq!(out1, out2);
}

#[test]
fn version_directive_and_start_mark() {
    let mut doc = Document::new(plain("a"));
    doc.state.version = Some((1, 2));
    assert_eq!(dump(&doc), "%YAML 1.2\n--- a\n");
}

#[test]
fn tag_directive_preamble() {
    let mut doc = Document::new(plain("a"));
    doc.state
        .tags
        .push(TagDirective::new("!e!", "tag:example.com,2000:app/"));
    // Default directives are suppressed.
    doc.state.tags.push(TagDirective::new("!!", "tag:yaml.org,2002:"));
    assert_eq!(dump(&doc), "%TAG !e! tag:example.com,2000:app/\n--- a\n");
}

#[test]
fn explicit_document_marks() {
    let mut doc = Document::new(plain("a"));
    doc.state.start_implicit = false;
    doc.state.end_implicit = false;
    assert_eq!(dump(&doc), "--- a\n...\n");
}

#[test]
fn document_mark_tristates() {
    let doc = Document::new(plain("a"));

    let on = EmitterConfig::new()
        .doc_start_mark(Presentation::On)
        .doc_end_mark(Presentation::On);
    assert_eq!(emit_document_to_string(&doc, on).unwrap(), "--- a\n...\n");

    let mut explicit = Document::new(plain("a"));
    explicit.state.start_implicit = false;
    explicit.state.end_implicit = false;
    let off = EmitterConfig::new()
        .doc_start_mark(Presentation::Off)
        .doc_end_mark(Presentation::Off);
    assert_eq!(emit_document_to_string(&explicit, off).unwrap(), "a\n");
}

#[test]
fn strip_doc_suppresses_directives() {
    let mut doc = Document::new(plain("a"));
    doc.state.version = Some((1, 2));
    doc.state.start_implicit = false;
    let out = emit_document_to_string(&doc, EmitterConfig::new().strip_doc(true)).unwrap();
    assert_eq!(out, "a\n");
}

#[test]
fn second_document_gets_start_mark() {
    let mut out = String::new();
    let mut emitter = yarrow::Emitter::new(&mut out, EmitterConfig::new());
    emitter.emit_document(&Document::new(plain("a"))).unwrap();
    emitter.emit_document(&Document::new(plain("b"))).unwrap();
    assert_eq!(out, "a\n--- b\n");
}

#[test]
fn comments_attach_to_items() {
    let doc = Document::new(Node::sequence(vec![
        plain("v").with_comments(Comments {
            top: Some("# note".into()),
            ..Comments::default()
        }),
        plain("w").with_comments(Comments {
            right: Some("# after".into()),
            ..Comments::default()
        }),
    ]));
    let out = emit_document_to_string(&doc, EmitterConfig::new().comments(true)).unwrap();
    assert_eq!(out, "- # note\n  v\n- w # after\n");

    // With comment output off, the same document emits bare.
    assert_eq!(dump(&doc), "- v\n- w\n");
}

#[test]
fn json_never_emits_yaml_decorations() {
    let mut doc = Document::new(
        Node::mapping([(plain("k"), plain("v").with_anchor("a1"))]),
    );
    doc.state.version = Some((1, 2));
    doc.state.start_implicit = false;
    doc.state.end_implicit = false;
    let out = emit_document_to_string(&doc, EmitterConfig::new().mode(Mode::JsonOneline)).unwrap();
    assert_eq!(out, "{\"k\": \"v\"}\n");
}

#[test]
fn json_tagged_plain_keeps_tagged_numbers() {
    let node = Node::mapping([(
        plain("n"),
        Node::scalar(ScalarToken::new("5", ScalarStyle::Plain)),
    )]);
    let tagged = Node::mapping([(
        plain("n"),
        Node::scalar(ScalarToken::new("0x1f", ScalarStyle::Plain))
            .with_tag(yarrow::Tag::new("!!", "int")),
    )]);

    let plain_cfg = EmitterConfig::new().mode(Mode::JsonOneline);
    let tp_cfg = EmitterConfig::new().mode(Mode::JsonTaggedPlain);

    assert_eq!(emit_node_to_string(&node, plain_cfg).unwrap(), "{\"n\": 5}");
    // In plain JSON mode the non-number text gets quoted despite the tag.
    assert_eq!(
        emit_node_to_string(&tagged, plain_cfg).unwrap(),
        "{\"n\": \"0x1f\"}"
    );
    // Tagged-plain JSON trusts the core-schema tag.
    assert_eq!(
        emit_node_to_string(&tagged, tp_cfg).unwrap(),
        "{\n  \"n\": 0x1f\n}"
    );
}

#[test]
fn wide_mode_disables_wrapping() {
    let input = Input::new("aaa\nbbb");
    let atom = Atom::over(&input, 0..input.len(), AtomStyle::Plain);
    let doc = Document::new(Node::scalar(ScalarToken::from_atom(atom)));
    let out = emit_document_to_string(&doc, EmitterConfig::new().width(255)).unwrap();
    assert_eq!(out, "aaa bbb\n");
}

#[test]
fn custom_document_state_survives_emission() {
    // DocumentState defaults are implicit marks and no directives.
    let state = DocumentState::default();
    assert!(state.start_implicit);
    assert!(state.end_implicit);
    assert!(state.version.is_none());
    assert!(state.tags.is_empty());
}
