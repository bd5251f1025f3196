//! Scripts: transpile to the configured target, then minify.
//!
//! Uses the oxc transformer, minifier and codegen.

use std::path::Path;

use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::diagnostics::OxcDiagnostic;
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::semantic::SemanticBuilder;
use oxc::span::SourceType;
use oxc::transformer::Transformer;

use crate::config::{ConfigError, JsConfig};
use crate::pipeline::BuildError;
use crate::pipeline::error::line_column;

pub struct JsTransform {
    config: JsConfig,
}

impl JsTransform {
    pub fn new(config: &JsConfig) -> Result<Self, ConfigError> {
        config.transform_options().map_err(ConfigError::Validation)?;
        Ok(Self {
            config: config.clone(),
        })
    }

    /// Transpile and minify one script.
    ///
    /// Sources are parsed as classic scripts, so top-level bindings stay
    /// global and are never mangled.
    pub fn minify(&self, path: &Path, source: &str) -> Result<String, BuildError> {
        let allocator = Allocator::default();
        let source_type = SourceType::default().with_module(false);

        let ret = Parser::new(&allocator, source, source_type).parse();
        if let Some(err) = ret.errors.first() {
            return Err(js_error(path, source, err));
        }
        let mut program = ret.program;

        let options = self
            .config
            .transform_options()
            .map_err(|e| BuildError::malformed(path, e))?;
        let scoping = SemanticBuilder::new().build(&program).semantic.into_scoping();
        let ret = Transformer::new(&allocator, path, &options).build_with_scoping(scoping, &mut program);
        if let Some(err) = ret.errors.first() {
            return Err(js_error(path, source, err));
        }

        let options = MinifierOptions {
            mangle: self.config.mangle.then(MangleOptions::default),
            compress: self.config.compress.then(CompressOptions::smallest),
        };
        let ret = Minifier::new(options).minify(&allocator, &mut program);

        let code = Codegen::new()
            .with_options(CodegenOptions {
                minify: true,
                comments: CommentOptions::disabled(),
                ..CodegenOptions::default()
            })
            .with_scoping(ret.scoping)
            .build(&program)
            .code;
        Ok(code)
    }
}

fn js_error(path: &Path, source: &str, err: &OxcDiagnostic) -> BuildError {
    let offset = err
        .labels
        .as_ref()
        .and_then(|labels| labels.first())
        .map(|label| label.offset());
    let (line, column) = offset.map_or((None, None), |offset| {
        let (line, column) = line_column(source, offset);
        (Some(line), Some(column))
    });
    BuildError::malformed(path, err.message.to_string()).at(line, column)
}
