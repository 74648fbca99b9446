use swc_common::{comments::SingleThreadedComments, sync::Lrc, FileName, SourceMap, Spanned};
use swc_ecma_ast::EsVersion;
use swc_ecma_parser::{EsSyntax, Syntax, TsSyntax};

use crate::emit::print_module;
use crate::error::{EmitError, ParseError};

/// Result of parsing a source file.
pub struct ParseResult {
    pub module: swc_ecma_ast::Module,
    pub comments: SingleThreadedComments,
    pub source_map: Lrc<SourceMap>,
}

impl ParseResult {
    /// Render `self.module` back to source text, comments included.
    pub fn print(&self) -> Result<String, EmitError> {
        print_module(&self.module, &self.source_map, Some(&self.comments))
    }
}

/// Pick the parser syntax from the file extension.
///
/// TypeScript for `.ts`/`.mts`/`.cts`, TSX for `.tsx`, and JavaScript with
/// JSX and decorators for everything else.
pub fn syntax_for(filename: &str) -> Syntax {
    let ext = filename.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
    match ext {
        "ts" | "mts" | "cts" => Syntax::Typescript(TsSyntax {
            decorators: true,
            ..Default::default()
        }),
        "tsx" => Syntax::Typescript(TsSyntax {
            tsx: true,
            decorators: true,
            ..Default::default()
        }),
        _ => Syntax::Es(EsSyntax {
            jsx: true,
            decorators: true,
            decorators_before_export: true,
            ..Default::default()
        }),
    }
}

fn parse_error(source_map: &SourceMap, filename: &str, e: &swc_ecma_parser::error::Error) -> ParseError {
    let loc = source_map.lookup_char_pos(e.span().lo);
    ParseError {
        filename: filename.to_string(),
        line: loc.line,
        column: loc.col.0,
        message: e.kind().msg().to_string(),
    }
}

/// Parse a JavaScript/TypeScript source string as a module.
pub fn parse_source(source: &str, filename: &str) -> Result<ParseResult, ParseError> {
    let source_map: Lrc<SourceMap> = Default::default();
    let source_file = source_map.new_source_file(
        Lrc::new(FileName::Real(filename.into())),
        source.to_string(),
    );

    let comments = SingleThreadedComments::default();
    let mut recovered = vec![];

    let module = swc_ecma_parser::parse_file_as_module(
        &source_file,
        syntax_for(filename),
        EsVersion::latest(),
        Some(&comments),
        &mut recovered,
    )
    .map_err(|e| parse_error(&source_map, filename, &e))?;

    // A recovered error still means the input is not a valid module.
    if let Some(first) = recovered.first() {
        tracing::debug!(
            "{filename}: parser recovered from {} error(s)",
            recovered.len()
        );
        return Err(parse_error(&source_map, filename, first));
    }

    Ok(ParseResult {
        module,
        comments,
        source_map,
    })
}
