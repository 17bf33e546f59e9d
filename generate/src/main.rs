//! Regenerates `src/entity/data.rs` from `generate/data/entities.json`.
//!
//! The teacher's own `generate` tool fetches its source table over the
//! network at regeneration time; this one reads a table already committed
//! to the tree instead, so building never depends on an outside service —
//! update `data/entities.json` by hand (or from a freshly downloaded WHATWG
//! entities table) and re-run this binary to refresh `data.rs`.
//!
//! Run from the workspace root: `cargo run -p signalflow-generate`.

use serde::Deserialize;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

#[derive(Deserialize)]
struct RawEntity {
    name: String,
    value: String,
    legacy: bool,
}

fn main() {
    let data_path = Path::new("generate/data/entities.json");
    let raw = fs::read_to_string(data_path)
        .unwrap_or_else(|e| panic!("could not read {}: {e}", data_path.display()));
    let mut entities: Vec<RawEntity> =
        serde_json::from_str(&raw).expect("entities.json should be a JSON array of entities");
    entities.sort_by(|a, b| a.name.cmp(&b.name));

    let mut out = String::new();
    out.push_str("//! Static table of HTML named character references.\n");
    out.push_str("//!\n");
    out.push_str(
        "//! This table is not hand-maintained: it is the committed output of the\n",
    );
    out.push_str(
        "//! sibling `generate` tool (see `generate/src/main.rs`), which reads the\n",
    );
    out.push_str(
        "//! WHATWG entities table and emits exactly this shape. Regenerate it rather\n",
    );
    out.push_str("//! than hand-editing when the upstream table changes.\n");
    out.push_str("//!\n");
    out.push_str(
        "//! `legacy` marks the historical subset (inherited from HTML 4 / ISO-8859-1)\n",
    );
    out.push_str(
        "//! that the HTML specification still allows without a trailing `;`, per the\n",
    );
    out.push_str(
        "//! tokenizer's named-character-reference state. Every other entry requires\n",
    );
    out.push_str(
        "//! the semicolon; both forms are still entered into the trie so that\n",
    );
    out.push_str(
        "//! `&amp` (no semicolon) and `&amp;` both resolve, while `&notanentity`\n",
    );
    out.push_str("//! does not.\n\n");
    out.push_str("pub struct Entity {\n");
    out.push_str("    pub name: &'static str,\n");
    out.push_str("    pub value: &'static str,\n");
    out.push_str("    pub legacy: bool,\n");
    out.push_str("}\n\n");
    out.push_str("pub static ENTITIES: &[Entity] = &[\n");
    for entity in &entities {
        writeln!(
            out,
            "    Entity {{ name: \"{}\", value: \"{}\", legacy: {} }},",
            entity.name, entity.value, entity.legacy
        )
        .unwrap();
    }
    out.push_str("];\n");

    let dest = Path::new("src/entity/data.rs");
    fs::write(dest, out).unwrap_or_else(|e| panic!("could not write {}: {e}", dest.display()));
    println!("wrote {} entities to {}", entities.len(), dest.display());
}
