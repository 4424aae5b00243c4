use crate::error::{Diag, Error};
use indexmap::IndexMap;

/// Cuts off self- or mutually-recursive macros; the grammar does not
/// forbid them, so expansion depth is bounded explicitly.
pub const MAX_EXPANSION_DEPTH: usize = 16;

/// One expanded line: comment-stripped, substituted text, tagged with the
/// 1-based line it originated from. Lines spliced out of a macro body keep
/// the invoking line's number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub text: String,
    pub line: usize,
    pub raw: String,
}

#[derive(Debug, Clone)]
struct Macro {
    name: String,
    params: Vec<String>,
    body: Vec<(usize, String)>,
}

#[derive(Debug, Default)]
pub struct Preprocessor {
    // Keyed by lowercased name; first definition wins.
    macros: IndexMap<String, Macro>,
}

impl Preprocessor {
    /// Expand defines and macros into a flat ordered line list.
    pub fn run(lines: &[String]) -> Result<Vec<SourceLine>, Vec<Diag>> {
        let numbered: Vec<(usize, String)> = lines
            .iter()
            .enumerate()
            .map(|(idx, raw)| (idx + 1, raw.clone()))
            .collect();

        let mut pp = Preprocessor::default();
        let mut defines = IndexMap::new();
        let mut out = vec![];
        let mut diags = vec![];
        pp.expand(&numbered, &mut defines, false, 0, &mut out, &mut diags);
        if diags.is_empty() {
            Ok(out)
        } else {
            Err(diags)
        }
    }

    fn expand(
        &mut self,
        lines: &[(usize, String)],
        defines: &mut IndexMap<String, String>,
        in_macro: bool,
        depth: usize,
        out: &mut Vec<SourceLine>,
        diags: &mut Vec<Diag>,
    ) {
        let mut i = 0;
        while i < lines.len() {
            let (line_num, raw) = &lines[i];
            let stripped = strip_comment(raw);
            let words: Vec<&str> = stripped.split_whitespace().collect();
            let first = words.first().copied().unwrap_or("");

            if first.eq_ignore_ascii_case(".define") {
                match words.get(1) {
                    Some(name) if is_ident(name) => {
                        defines.insert(name.to_string(), words[2..].join(" "));
                    }
                    _ => diags.push(Diag::new(
                        *line_num,
                        Error::MalformedDirective(stripped.trim().to_string()),
                    )),
                }
                i += 1;
                continue;
            }

            if first.eq_ignore_ascii_case(".macro") {
                if in_macro {
                    diags.push(Diag::new(*line_num, Error::NestedMacro));
                }
                let name = match words.get(1) {
                    Some(name) if is_ident(name) => name.to_string(),
                    _ => {
                        diags.push(Diag::new(
                            *line_num,
                            Error::MalformedDirective(stripped.trim().to_string()),
                        ));
                        String::new()
                    }
                };
                let params: Vec<String> =
                    words.iter().skip(2).map(|s| s.to_string()).collect();
                if params.iter().any(|p| !is_ident(p)) {
                    diags.push(Diag::new(
                        *line_num,
                        Error::MalformedDirective(stripped.trim().to_string()),
                    ));
                }

                // Capture the body verbatim (comments stripped) up to .endmacro.
                let mut body = vec![];
                let mut closed = false;
                let mut j = i + 1;
                while j < lines.len() {
                    let (body_num, body_raw) = &lines[j];
                    let body_stripped = strip_comment(body_raw);
                    let body_first =
                        body_stripped.split_whitespace().next().unwrap_or("");
                    if body_first.eq_ignore_ascii_case(".endmacro") {
                        closed = true;
                        j += 1;
                        break;
                    }
                    if body_first.eq_ignore_ascii_case(".macro") {
                        diags.push(Diag::new(*body_num, Error::NestedMacro));
                    }
                    body.push((*body_num, body_stripped.to_string()));
                    j += 1;
                }
                if !closed {
                    diags.push(Diag::new(
                        *line_num,
                        Error::UnterminatedMacro(name.clone()),
                    ));
                }
                if !in_macro && !name.is_empty() {
                    self.macros
                        .entry(name.to_ascii_lowercase())
                        .or_insert(Macro { name, params, body });
                }
                i = j;
                continue;
            }

            if first.eq_ignore_ascii_case(".endmacro") || first.starts_with('.') {
                diags.push(Diag::new(
                    *line_num,
                    Error::MalformedDirective(stripped.trim().to_string()),
                ));
                i += 1;
                continue;
            }

            // Non-directive: apply every active substitution, whole-word.
            let mut text = stripped.to_string();
            for (name, replacement) in defines.iter() {
                text = replace_word(&text, name, replacement);
            }

            // Macro invocation: the first token past an optional label
            // names a known macro. The label goes out on its own line so
            // it still binds to the expansion's first byte.
            let words: Vec<&str> = text.split_whitespace().collect();
            let mut rest = &words[..];
            let mut label = None;
            if let Some(first) = rest.first() {
                if let Some(name) = first.strip_suffix(':') {
                    if is_ident(name) {
                        label = Some(*first);
                        rest = &rest[1..];
                    }
                }
            }
            if let Some(head) = rest.first() {
                if let Some(mac) = self.macros.get(&head.to_ascii_lowercase()).cloned() {
                    let args = &rest[1..];
                    if args.len() != mac.params.len() {
                        diags.push(Diag::new(
                            *line_num,
                            Error::MacroArityMismatch {
                                name: mac.name.clone(),
                                expected: mac.params.len(),
                                found: args.len(),
                            },
                        ));
                        i += 1;
                        continue;
                    }
                    if depth >= MAX_EXPANSION_DEPTH {
                        diags.push(Diag::new(
                            *line_num,
                            Error::MacroDepthExceeded(mac.name.clone()),
                        ));
                        i += 1;
                        continue;
                    }

                    if let Some(label) = label {
                        out.push(SourceLine {
                            text: label.to_string(),
                            line: *line_num,
                            raw: raw.clone(),
                        });
                    }

                    // Parameter bindings live in a private copy of the scope.
                    let mut local = defines.clone();
                    for (param, arg) in mac.params.iter().zip(args) {
                        local.insert(param.clone(), arg.to_string());
                    }
                    let mut spliced = vec![];
                    self.expand(&mac.body, &mut local, true, depth + 1, &mut spliced, diags);
                    for mut line in spliced {
                        line.line = *line_num;
                        out.push(line);
                    }
                    i += 1;
                    continue;
                }
            }

            out.push(SourceLine {
                text,
                line: *line_num,
                raw: raw.clone(),
            });
            i += 1;
        }
    }
}

/// Comments run from `;` or `//` to end of line.
fn strip_comment(line: &str) -> &str {
    let semi = line.find(';').unwrap_or(line.len());
    let slashes = line.find("//").unwrap_or(line.len());
    &line[..semi.min(slashes)]
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => chars.all(is_ident_char),
        _ => false,
    }
}

/// Whole-word textual replacement: `name` matches only when not flanked by
/// identifier characters, so defines can stand in for registers, literals,
/// or pieces of a slice reference like `#NAME:0`.
fn replace_word(text: &str, name: &str, replacement: &str) -> String {
    if name.is_empty() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    while let Some(found) = text[pos..].find(name) {
        let start = pos + found;
        let end = start + name.len();
        let before = text[..start].chars().next_back();
        let after = text[end..].chars().next();
        out.push_str(&text[pos..start]);
        if before.map_or(true, |c| !is_ident_char(c))
            && after.map_or(true, |c| !is_ident_char(c))
        {
            out.push_str(replacement);
        } else {
            out.push_str(&text[start..end]);
        }
        pos = end;
    }
    out.push_str(&text[pos..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(src: &str) -> Result<Vec<SourceLine>, Vec<Diag>> {
        let lines: Vec<String> = src.lines().map(str::to_string).collect();
        Preprocessor::run(&lines)
    }

    fn texts(out: &[SourceLine]) -> Vec<(usize, String)> {
        out.iter().map(|l| (l.line, l.text.trim().to_string())).collect()
    }

    #[test]
    fn strips_comments_and_keeps_empty_lines() {
        let out = run("SM ; push\n\n// whole line\nNP").unwrap();
        assert_eq!(
            texts(&out),
            vec![
                (1, "SM".to_string()),
                (2, "".to_string()),
                (3, "".to_string()),
                (4, "NP".to_string()),
            ]
        );
    }

    #[test]
    fn define_substitutes_whole_words() {
        let out = run(".define ACC r10\nSC ACC\nSC ACCX").unwrap();
        assert_eq!(
            texts(&out),
            vec![(2, "SC r10".to_string()), (3, "SC ACCX".to_string())]
        );
    }

    #[test]
    fn define_can_name_part_of_a_slice_ref() {
        let out = run(".define TARGET loop\nLI #TARGET:0").unwrap();
        assert_eq!(texts(&out), vec![(2, "LI #loop:0".to_string())]);
    }

    #[test]
    fn macro_expansion_inlines_the_template() {
        let src = ".macro DOUBLE reg\nSC reg\nSC reg\n.endmacro\nDOUBLE r3";
        let out = run(src).unwrap();
        assert_eq!(
            texts(&out),
            vec![(5, "SC r3".to_string()), (5, "SC r3".to_string())]
        );
    }

    #[test]
    fn label_before_invocation_comes_out_on_its_own_line() {
        let src = ".macro ONE reg\nSC reg\n.endmacro\nstart: ONE r1";
        let out = run(src).unwrap();
        assert_eq!(
            texts(&out),
            vec![(4, "start:".to_string()), (4, "SC r1".to_string())]
        );
    }

    #[test]
    fn macro_bindings_do_not_leak() {
        let src = ".macro ONE reg\nSC reg\n.endmacro\nONE r1\nSC reg";
        let out = run(src).unwrap();
        assert_eq!(
            texts(&out),
            vec![(4, "SC r1".to_string()), (5, "SC reg".to_string())]
        );
    }

    #[test]
    fn macro_arity_mismatch() {
        let src = ".macro TWO a b\nSC a\nSU b\n.endmacro\nTWO r1";
        let diags = run(src).unwrap_err();
        assert!(matches!(
            diags[0].error,
            Error::MacroArityMismatch { expected: 2, found: 1, .. }
        ));
        assert_eq!(diags[0].line, 5);
    }

    #[test]
    fn unterminated_macro() {
        let diags = run(".macro OPEN\nSM").unwrap_err();
        assert!(matches!(diags[0].error, Error::UnterminatedMacro(_)));
    }

    #[test]
    fn nested_macro_rejected() {
        let src = ".macro OUTER\n.macro INNER\n.endmacro\n.endmacro";
        let diags = run(src).unwrap_err();
        assert!(diags.iter().any(|d| d.error == Error::NestedMacro));
    }

    #[test]
    fn recursive_macro_hits_depth_limit() {
        let src = ".macro LOOPY\nLOOPY\n.endmacro\nLOOPY";
        let diags = run(src).unwrap_err();
        assert!(matches!(diags[0].error, Error::MacroDepthExceeded(_)));
    }

    #[test]
    fn macro_params_must_be_identifiers() {
        let diags = run(".macro BAD 1x\nSM\n.endmacro").unwrap_err();
        assert!(matches!(diags[0].error, Error::MalformedDirective(_)));
        assert_eq!(diags[0].line, 1);
    }

    #[test]
    fn unknown_directive() {
        let diags = run(".include lib.asm").unwrap_err();
        assert!(matches!(diags[0].error, Error::MalformedDirective(_)));
    }
}
