#[macro_use]
extern crate quickcheck;

use quickcheck::TestResult;

use yarrow::{
    emit_document_to_string, Document, EmitterConfig, Mode, Node, ScalarStyle, ScalarToken,
};

fn string_sequence(xs: &[String]) -> Document<'_> {
    Document::new(Node::sequence(
        xs.iter()
            .map(|x| Node::scalar(ScalarToken::new(x.as_str(), ScalarStyle::Any)))
            .collect(),
    ))
}

quickcheck! {
    fn emission_is_deterministic(xs: Vec<String>) -> bool {
        let doc = string_sequence(&xs);
        let first = emit_document_to_string(&doc, EmitterConfig::new()).unwrap();
        let second = emit_document_to_string(&doc, EmitterConfig::new()).unwrap();
        first == second
    }

    fn column_resets_at_line_breaks(xs: Vec<String>) -> bool {
        let doc = string_sequence(&xs);
        let mut out = String::new();
        let mut emitter = yarrow::Emitter::new(&mut out, EmitterConfig::new());
        emitter.emit_document(&doc).unwrap();
        // The document end always breaks the line, so the column must be 0.
        emitter.column() == 0
    }

    fn sorted_emission_ignores_insertion_order(keys: Vec<String>) -> TestResult {
        // Build the same logical mapping with two insertion orders.
        let values: Vec<String> = (0..keys.len()).map(|i| i.to_string()).collect();
        let pair = |k: &String, v: &String| {
            (
                Node::scalar(ScalarToken::new(k.clone(), ScalarStyle::Any)),
                Node::scalar(ScalarToken::new(v.clone(), ScalarStyle::Any)),
            )
        };

        let forwards = Document::new(Node::mapping(
            keys.iter().zip(&values).map(|(k, v)| pair(k, v)),
        ));
        let backwards = Document::new(Node::mapping(
            keys.iter().zip(&values).rev().map(|(k, v)| pair(k, v)),
        ));

        // Duplicate keys make the two maps hold different pairs; skip those.
        let (Node::Mapping(f), Node::Mapping(b)) =
            (forwards.root.as_ref().unwrap(), backwards.root.as_ref().unwrap())
        else {
            unreachable!()
        };
        if f.pairs.len() != keys.len() || b.pairs.len() != keys.len() {
            return TestResult::discard();
        }

        let cfg = EmitterConfig::new().sort_keys(true);
        TestResult::from_bool(
            emit_document_to_string(&forwards, cfg).unwrap()
                == emit_document_to_string(&backwards, cfg).unwrap(),
        )
    }

    fn json_output_parses_for_printable_strings(xs: Vec<String>) -> TestResult {
        use yarrow_atom::char_traits::{is_generic_lb, is_printable};

        // Control characters and unicode breaks escape as YAML-only
        // sequences (`\e`, `\L`, ...); JSON conformance is only promised for
        // printable text.
        if xs
            .iter()
            .any(|x| x.chars().any(|c| !is_printable(c) || is_generic_lb(c)))
        {
            return TestResult::discard();
        }

        let doc = string_sequence(&xs);
        let out =
            emit_document_to_string(&doc, EmitterConfig::new().mode(Mode::JsonOneline)).unwrap();
        match serde_json::from_str::<serde_json::Value>(&out) {
            Ok(serde_json::Value::Array(values)) => {
                TestResult::from_bool(values.len() == xs.len())
            }
            Ok(_) => TestResult::from_bool(false),
            Err(err) => TestResult::error(err.to_string()),
        }
    }
}
