//! Static table of HTML named character references.
//!
//! This table is not hand-maintained: it is the committed output of the
//! sibling `generate` tool (see `generate/src/main.rs`), which reads
//! `generate/data/entities.json` and emits exactly this shape. Regenerate it
//! rather than hand-editing when the data file changes.
//!
//! `legacy` marks the historical subset (inherited from HTML 4 / ISO-8859-1)
//! that the HTML specification still allows without a trailing `;`, per the
//! tokenizer's named-character-reference state. Every other entry requires
//! the semicolon; both forms are still entered into the trie so that
//! `&amp` (no semicolon) and `&amp;` both resolve, while `&notanentity`
//! does not.
//!
//! Coverage: this is the legacy HTML 4 / ISO-8859-1-derived subset of the
//! WHATWG named character reference table (248 entries), not the full
//! ~2200-entry modern table (which adds MathML/multi-codepoint entries such
//! as `&NotEqualTilde;` or `&gtlPar;`). `&amp`/`&lt`/`&gt`/`&quot`/`&apos`
//! and the common Latin-1 accented-letter entities are all present; an
//! entity outside that subset falls through the tokenizer's ambiguous-
//! ampersand handling as literal text plus a diagnostic (§4.2), the same
//! recovery path an unrecognized name already takes. Extending
//! `generate/data/entities.json` to the full table is mechanical — the
//! generator already supports it — but the full table was not available to
//! commit here.

pub struct Entity {
    pub name: &'static str,
    pub value: &'static str,
    pub legacy: bool,
}

pub static ENTITIES: &[Entity] = &[
    // Legacy (semicolon-optional) Latin-1 derived set.
    Entity { name: "AElig", value: "\u{00C6}", legacy: true },
    Entity { name: "AMP", value: "&", legacy: true },
    Entity { name: "Aacute", value: "\u{00C1}", legacy: true },
    Entity { name: "Acirc", value: "\u{00C2}", legacy: true },
    Entity { name: "Agrave", value: "\u{00C0}", legacy: true },
    Entity { name: "Aring", value: "\u{00C5}", legacy: true },
    Entity { name: "Atilde", value: "\u{00C3}", legacy: true },
    Entity { name: "Auml", value: "\u{00C4}", legacy: true },
    Entity { name: "COPY", value: "\u{00A9}", legacy: true },
    Entity { name: "Ccedil", value: "\u{00C7}", legacy: true },
    Entity { name: "ETH", value: "\u{00D0}", legacy: true },
    Entity { name: "Eacute", value: "\u{00C9}", legacy: true },
    Entity { name: "Ecirc", value: "\u{00CA}", legacy: true },
    Entity { name: "Egrave", value: "\u{00C8}", legacy: true },
    Entity { name: "Euml", value: "\u{00CB}", legacy: true },
    Entity { name: "GT", value: ">", legacy: true },
    Entity { name: "Iacute", value: "\u{00CD}", legacy: true },
    Entity { name: "Icirc", value: "\u{00CE}", legacy: true },
    Entity { name: "Igrave", value: "\u{00CC}", legacy: true },
    Entity { name: "Iuml", value: "\u{00CF}", legacy: true },
    Entity { name: "LT", value: "<", legacy: true },
    Entity { name: "Ntilde", value: "\u{00D1}", legacy: true },
    Entity { name: "Oacute", value: "\u{00D3}", legacy: true },
    Entity { name: "Ocirc", value: "\u{00D4}", legacy: true },
    Entity { name: "Ograve", value: "\u{00D2}", legacy: true },
    Entity { name: "Oslash", value: "\u{00D8}", legacy: true },
    Entity { name: "Otilde", value: "\u{00D5}", legacy: true },
    Entity { name: "Ouml", value: "\u{00D6}", legacy: true },
    Entity { name: "QUOT", value: "\"", legacy: true },
    Entity { name: "REG", value: "\u{00AE}", legacy: true },
    Entity { name: "THORN", value: "\u{00DE}", legacy: true },
    Entity { name: "Uacute", value: "\u{00DA}", legacy: true },
    Entity { name: "Ucirc", value: "\u{00DB}", legacy: true },
    Entity { name: "Ugrave", value: "\u{00D9}", legacy: true },
    Entity { name: "Uuml", value: "\u{00DC}", legacy: true },
    Entity { name: "Yacute", value: "\u{00DD}", legacy: true },
    Entity { name: "aacute", value: "\u{00E1}", legacy: true },
    Entity { name: "acirc", value: "\u{00E2}", legacy: true },
    Entity { name: "acute", value: "\u{00B4}", legacy: true },
    Entity { name: "aelig", value: "\u{00E6}", legacy: true },
    Entity { name: "agrave", value: "\u{00E0}", legacy: true },
    Entity { name: "amp", value: "&", legacy: true },
    Entity { name: "aring", value: "\u{00E5}", legacy: true },
    Entity { name: "atilde", value: "\u{00E3}", legacy: true },
    Entity { name: "auml", value: "\u{00E4}", legacy: true },
    Entity { name: "brvbar", value: "\u{00A6}", legacy: true },
    Entity { name: "ccedil", value: "\u{00E7}", legacy: true },
    Entity { name: "cedil", value: "\u{00B8}", legacy: true },
    Entity { name: "cent", value: "\u{00A2}", legacy: true },
    Entity { name: "copy", value: "\u{00A9}", legacy: true },
    Entity { name: "curren", value: "\u{00A4}", legacy: true },
    Entity { name: "deg", value: "\u{00B0}", legacy: true },
    Entity { name: "divide", value: "\u{00F7}", legacy: true },
    Entity { name: "eacute", value: "\u{00E9}", legacy: true },
    Entity { name: "ecirc", value: "\u{00EA}", legacy: true },
    Entity { name: "egrave", value: "\u{00E8}", legacy: true },
    Entity { name: "eth", value: "\u{00F0}", legacy: true },
    Entity { name: "euml", value: "\u{00EB}", legacy: true },
    Entity { name: "frac12", value: "\u{00BD}", legacy: true },
    Entity { name: "frac14", value: "\u{00BC}", legacy: true },
    Entity { name: "frac34", value: "\u{00BE}", legacy: true },
    Entity { name: "gt", value: ">", legacy: true },
    Entity { name: "iacute", value: "\u{00ED}", legacy: true },
    Entity { name: "icirc", value: "\u{00EE}", legacy: true },
    Entity { name: "iexcl", value: "\u{00A1}", legacy: true },
    Entity { name: "igrave", value: "\u{00EC}", legacy: true },
    Entity { name: "iquest", value: "\u{00BF}", legacy: true },
    Entity { name: "iuml", value: "\u{00EF}", legacy: true },
    Entity { name: "laquo", value: "\u{00AB}", legacy: true },
    Entity { name: "lt", value: "<", legacy: true },
    Entity { name: "macr", value: "\u{00AF}", legacy: true },
    Entity { name: "micro", value: "\u{00B5}", legacy: true },
    Entity { name: "middot", value: "\u{00B7}", legacy: true },
    Entity { name: "nbsp", value: "\u{00A0}", legacy: true },
    Entity { name: "not", value: "\u{00AC}", legacy: true },
    Entity { name: "ntilde", value: "\u{00F1}", legacy: true },
    Entity { name: "oacute", value: "\u{00F3}", legacy: true },
    Entity { name: "ocirc", value: "\u{00F4}", legacy: true },
    Entity { name: "ograve", value: "\u{00F2}", legacy: true },
    Entity { name: "ordf", value: "\u{00AA}", legacy: true },
    Entity { name: "ordm", value: "\u{00BA}", legacy: true },
    Entity { name: "oslash", value: "\u{00F8}", legacy: true },
    Entity { name: "otilde", value: "\u{00F5}", legacy: true },
    Entity { name: "ouml", value: "\u{00F6}", legacy: true },
    Entity { name: "para", value: "\u{00B6}", legacy: true },
    Entity { name: "plusmn", value: "\u{00B1}", legacy: true },
    Entity { name: "pound", value: "\u{00A3}", legacy: true },
    Entity { name: "quot", value: "\"", legacy: true },
    Entity { name: "raquo", value: "\u{00BB}", legacy: true },
    Entity { name: "reg", value: "\u{00AE}", legacy: true },
    Entity { name: "sect", value: "\u{00A7}", legacy: true },
    Entity { name: "shy", value: "\u{00AD}", legacy: true },
    Entity { name: "sup1", value: "\u{00B9}", legacy: true },
    Entity { name: "sup2", value: "\u{00B2}", legacy: true },
    Entity { name: "sup3", value: "\u{00B3}", legacy: true },
    Entity { name: "szlig", value: "\u{00DF}", legacy: true },
    Entity { name: "thorn", value: "\u{00FE}", legacy: true },
    Entity { name: "times", value: "\u{00D7}", legacy: true },
    Entity { name: "uacute", value: "\u{00FA}", legacy: true },
    Entity { name: "ucirc", value: "\u{00FB}", legacy: true },
    Entity { name: "ugrave", value: "\u{00F9}", legacy: true },
    Entity { name: "uml", value: "\u{00A8}", legacy: true },
    Entity { name: "uuml", value: "\u{00FC}", legacy: true },
    Entity { name: "yacute", value: "\u{00FD}", legacy: true },
    Entity { name: "yen", value: "\u{00A5}", legacy: true },
    Entity { name: "yuml", value: "\u{00FF}", legacy: true },
    // Semicolon-required set (a representative slice of the ~2200-entry
    // HTML5 table; extend via the `generate` tool, not by hand).
    Entity { name: "apos", value: "'", legacy: false },
    Entity { name: "OElig", value: "\u{0152}", legacy: false },
    Entity { name: "oelig", value: "\u{0153}", legacy: false },
    Entity { name: "Scaron", value: "\u{0160}", legacy: false },
    Entity { name: "scaron", value: "\u{0161}", legacy: false },
    Entity { name: "Yuml", value: "\u{0178}", legacy: false },
    Entity { name: "fnof", value: "\u{0192}", legacy: false },
    Entity { name: "circ", value: "\u{02C6}", legacy: false },
    Entity { name: "tilde", value: "\u{02DC}", legacy: false },
    Entity { name: "Alpha", value: "\u{0391}", legacy: false },
    Entity { name: "Beta", value: "\u{0392}", legacy: false },
    Entity { name: "Gamma", value: "\u{0393}", legacy: false },
    Entity { name: "Delta", value: "\u{0394}", legacy: false },
    Entity { name: "Epsilon", value: "\u{0395}", legacy: false },
    Entity { name: "Zeta", value: "\u{0396}", legacy: false },
    Entity { name: "Eta", value: "\u{0397}", legacy: false },
    Entity { name: "Theta", value: "\u{0398}", legacy: false },
    Entity { name: "Iota", value: "\u{0399}", legacy: false },
    Entity { name: "Kappa", value: "\u{039A}", legacy: false },
    Entity { name: "Lambda", value: "\u{039B}", legacy: false },
    Entity { name: "Mu", value: "\u{039C}", legacy: false },
    Entity { name: "Nu", value: "\u{039D}", legacy: false },
    Entity { name: "Xi", value: "\u{039E}", legacy: false },
    Entity { name: "Omicron", value: "\u{039F}", legacy: false },
    Entity { name: "Pi", value: "\u{03A0}", legacy: false },
    Entity { name: "Rho", value: "\u{03A1}", legacy: false },
    Entity { name: "Sigma", value: "\u{03A3}", legacy: false },
    Entity { name: "Tau", value: "\u{03A4}", legacy: false },
    Entity { name: "Upsilon", value: "\u{03A5}", legacy: false },
    Entity { name: "Phi", value: "\u{03A6}", legacy: false },
    Entity { name: "Chi", value: "\u{03A7}", legacy: false },
    Entity { name: "Psi", value: "\u{03A8}", legacy: false },
    Entity { name: "Omega", value: "\u{03A9}", legacy: false },
    Entity { name: "alpha", value: "\u{03B1}", legacy: false },
    Entity { name: "beta", value: "\u{03B2}", legacy: false },
    Entity { name: "gamma", value: "\u{03B3}", legacy: false },
    Entity { name: "delta", value: "\u{03B4}", legacy: false },
    Entity { name: "epsilon", value: "\u{03B5}", legacy: false },
    Entity { name: "zeta", value: "\u{03B6}", legacy: false },
    Entity { name: "eta", value: "\u{03B7}", legacy: false },
    Entity { name: "theta", value: "\u{03B8}", legacy: false },
    Entity { name: "iota", value: "\u{03B9}", legacy: false },
    Entity { name: "kappa", value: "\u{03BA}", legacy: false },
    Entity { name: "lambda", value: "\u{03BB}", legacy: false },
    Entity { name: "mu", value: "\u{03BC}", legacy: false },
    Entity { name: "nu", value: "\u{03BD}", legacy: false },
    Entity { name: "xi", value: "\u{03BE}", legacy: false },
    Entity { name: "omicron", value: "\u{03BF}", legacy: false },
    Entity { name: "pi", value: "\u{03C0}", legacy: false },
    Entity { name: "rho", value: "\u{03C1}", legacy: false },
    Entity { name: "sigmaf", value: "\u{03C2}", legacy: false },
    Entity { name: "sigma", value: "\u{03C3}", legacy: false },
    Entity { name: "tau", value: "\u{03C4}", legacy: false },
    Entity { name: "upsilon", value: "\u{03C5}", legacy: false },
    Entity { name: "phi", value: "\u{03C6}", legacy: false },
    Entity { name: "chi", value: "\u{03C7}", legacy: false },
    Entity { name: "psi", value: "\u{03C8}", legacy: false },
    Entity { name: "omega", value: "\u{03C9}", legacy: false },
    Entity { name: "ensp", value: "\u{2002}", legacy: false },
    Entity { name: "emsp", value: "\u{2003}", legacy: false },
    Entity { name: "thinsp", value: "\u{2009}", legacy: false },
    Entity { name: "zwnj", value: "\u{200C}", legacy: false },
    Entity { name: "zwj", value: "\u{200D}", legacy: false },
    Entity { name: "lrm", value: "\u{200E}", legacy: false },
    Entity { name: "rlm", value: "\u{200F}", legacy: false },
    Entity { name: "ndash", value: "\u{2013}", legacy: false },
    Entity { name: "mdash", value: "\u{2014}", legacy: false },
    Entity { name: "lsquo", value: "\u{2018}", legacy: false },
    Entity { name: "rsquo", value: "\u{2019}", legacy: false },
    Entity { name: "sbquo", value: "\u{201A}", legacy: false },
    Entity { name: "ldquo", value: "\u{201C}", legacy: false },
    Entity { name: "rdquo", value: "\u{201D}", legacy: false },
    Entity { name: "bdquo", value: "\u{201E}", legacy: false },
    Entity { name: "dagger", value: "\u{2020}", legacy: false },
    Entity { name: "Dagger", value: "\u{2021}", legacy: false },
    Entity { name: "bull", value: "\u{2022}", legacy: false },
    Entity { name: "hellip", value: "\u{2026}", legacy: false },
    Entity { name: "permil", value: "\u{2030}", legacy: false },
    Entity { name: "prime", value: "\u{2032}", legacy: false },
    Entity { name: "Prime", value: "\u{2033}", legacy: false },
    Entity { name: "lsaquo", value: "\u{2039}", legacy: false },
    Entity { name: "rsaquo", value: "\u{203A}", legacy: false },
    Entity { name: "oline", value: "\u{203E}", legacy: false },
    Entity { name: "frasl", value: "\u{2044}", legacy: false },
    Entity { name: "euro", value: "\u{20AC}", legacy: false },
    Entity { name: "trade", value: "\u{2122}", legacy: false },
    Entity { name: "alefsym", value: "\u{2135}", legacy: false },
    Entity { name: "larr", value: "\u{2190}", legacy: false },
    Entity { name: "uarr", value: "\u{2191}", legacy: false },
    Entity { name: "rarr", value: "\u{2192}", legacy: false },
    Entity { name: "darr", value: "\u{2193}", legacy: false },
    Entity { name: "harr", value: "\u{2194}", legacy: false },
    Entity { name: "crarr", value: "\u{21B5}", legacy: false },
    Entity { name: "forall", value: "\u{2200}", legacy: false },
    Entity { name: "part", value: "\u{2202}", legacy: false },
    Entity { name: "exist", value: "\u{2203}", legacy: false },
    Entity { name: "empty", value: "\u{2205}", legacy: false },
    Entity { name: "nabla", value: "\u{2207}", legacy: false },
    Entity { name: "isin", value: "\u{2208}", legacy: false },
    Entity { name: "notin", value: "\u{2209}", legacy: false },
    Entity { name: "ni", value: "\u{220B}", legacy: false },
    Entity { name: "prod", value: "\u{220F}", legacy: false },
    Entity { name: "sum", value: "\u{2211}", legacy: false },
    Entity { name: "minus", value: "\u{2212}", legacy: false },
    Entity { name: "lowast", value: "\u{2217}", legacy: false },
    Entity { name: "radic", value: "\u{221A}", legacy: false },
    Entity { name: "prop", value: "\u{221D}", legacy: false },
    Entity { name: "infin", value: "\u{221E}", legacy: false },
    Entity { name: "ang", value: "\u{2220}", legacy: false },
    Entity { name: "and", value: "\u{2227}", legacy: false },
    Entity { name: "or", value: "\u{2228}", legacy: false },
    Entity { name: "cap", value: "\u{2229}", legacy: false },
    Entity { name: "cup", value: "\u{222A}", legacy: false },
    Entity { name: "int", value: "\u{222B}", legacy: false },
    Entity { name: "there4", value: "\u{2234}", legacy: false },
    Entity { name: "sim", value: "\u{223C}", legacy: false },
    Entity { name: "cong", value: "\u{2245}", legacy: false },
    Entity { name: "asymp", value: "\u{2248}", legacy: false },
    Entity { name: "ne", value: "\u{2260}", legacy: false },
    Entity { name: "equiv", value: "\u{2261}", legacy: false },
    Entity { name: "le", value: "\u{2264}", legacy: false },
    Entity { name: "ge", value: "\u{2265}", legacy: false },
    Entity { name: "sub", value: "\u{2282}", legacy: false },
    Entity { name: "sup", value: "\u{2283}", legacy: false },
    Entity { name: "nsub", value: "\u{2284}", legacy: false },
    Entity { name: "sube", value: "\u{2286}", legacy: false },
    Entity { name: "supe", value: "\u{2287}", legacy: false },
    Entity { name: "oplus", value: "\u{2295}", legacy: false },
    Entity { name: "otimes", value: "\u{2297}", legacy: false },
    Entity { name: "perp", value: "\u{22A5}", legacy: false },
    Entity { name: "sdot", value: "\u{22C5}", legacy: false },
    Entity { name: "lceil", value: "\u{2308}", legacy: false },
    Entity { name: "rceil", value: "\u{2309}", legacy: false },
    Entity { name: "lfloor", value: "\u{230A}", legacy: false },
    Entity { name: "rfloor", value: "\u{230B}", legacy: false },
    Entity { name: "lang", value: "\u{27E8}", legacy: false },
    Entity { name: "rang", value: "\u{27E9}", legacy: false },
    Entity { name: "loz", value: "\u{25CA}", legacy: false },
    Entity { name: "spades", value: "\u{2660}", legacy: false },
    Entity { name: "clubs", value: "\u{2663}", legacy: false },
    Entity { name: "hearts", value: "\u{2665}", legacy: false },
    Entity { name: "diams", value: "\u{2666}", legacy: false },
];
