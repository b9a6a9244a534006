use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::domain::models::{StreamDescriptor, StreamKind};
use crate::error::{MediaError, MediaResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamSelector {
    All,
    Kind(StreamKind),
    Index(u32),
    KindWithLanguage(StreamKind, String),
}

impl StreamSelector {
    fn specifier(&self) -> MediaResult<String> {
        Ok(match self {
            StreamSelector::All => String::new(),
            StreamSelector::Kind(kind) => format!(":{}", kind_letter(kind)?),
            StreamSelector::Index(index) => format!(":{index}"),
            StreamSelector::KindWithLanguage(kind, language) => {
                format!(":{}:m:language:{language}", kind_letter(kind)?)
            }
        })
    }

    fn matches(&self, stream: &StreamDescriptor) -> bool {
        match self {
            StreamSelector::All => true,
            StreamSelector::Kind(kind) => &stream.kind == kind,
            StreamSelector::Index(index) => stream.index == *index,
            StreamSelector::KindWithLanguage(kind, language) => {
                &stream.kind == kind && stream.language() == Some(language.as_str())
            }
        }
    }
}

fn kind_letter(kind: &StreamKind) -> MediaResult<char> {
    kind.specifier()
        .ok_or_else(|| MediaError::UnsupportedStreamKind(kind.to_string()))
}

/// One `-map` argument: select or deselect streams of one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapDirective {
    Include { input: usize, selector: StreamSelector },
    Exclude { input: usize, selector: StreamSelector },
}

impl MapDirective {
    pub fn include(input: usize, selector: StreamSelector) -> Self {
        MapDirective::Include { input, selector }
    }

    pub fn exclude(input: usize, selector: StreamSelector) -> Self {
        MapDirective::Exclude { input, selector }
    }

    pub fn render(&self) -> MediaResult<String> {
        Ok(match self {
            MapDirective::Include { input, selector } => {
                format!("{input}{}", selector.specifier()?)
            }
            MapDirective::Exclude { input, selector } => {
                format!("-{input}{}", selector.specifier()?)
            }
        })
    }
}

/// Sets a tag on one output stream, addressed by kind and position among
/// output streams of that kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataDirective {
    pub kind: StreamKind,
    pub slot: usize,
    pub key: String,
    pub value: String,
}

impl MetadataDirective {
    pub fn language(kind: StreamKind, slot: usize, language: &str) -> Self {
        Self {
            kind,
            slot,
            key: "language".to_string(),
            value: language.to_string(),
        }
    }

    fn flag(&self) -> MediaResult<String> {
        Ok(format!("-metadata:s:{}:{}", kind_letter(&self.kind)?, self.slot))
    }
}

/// Everything the remux tool needs apart from the destination. Codecs are
/// always copied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemuxJob {
    pub inputs: Vec<PathBuf>,
    pub maps: Vec<MapDirective>,
    pub metadata: Vec<MetadataDirective>,
}

impl RemuxJob {
    pub fn new(inputs: Vec<PathBuf>) -> Self {
        Self {
            inputs,
            ..Default::default()
        }
    }

    pub fn map(mut self, directive: MapDirective) -> Self {
        self.maps.push(directive);
        self
    }

    pub fn tag(mut self, directive: MetadataDirective) -> Self {
        self.metadata.push(directive);
        self
    }

    /// Fails if a directive names a stream kind the tool has no specifier for.
    pub fn to_args(&self, destination: &Path) -> MediaResult<Vec<OsString>> {
        let mut args: Vec<OsString> = vec!["-y".into()];
        for input in &self.inputs {
            args.push("-i".into());
            args.push(input.into());
        }
        for directive in &self.maps {
            args.push("-map".into());
            args.push(directive.render()?.into());
        }
        for directive in &self.metadata {
            args.push(directive.flag()?.into());
            args.push(format!("{}={}", directive.key, directive.value).into());
        }
        args.push("-c".into());
        args.push("copy".into());
        args.push(destination.into());
        Ok(args)
    }

    /// Evaluates the map directives against known stream lists, one per input,
    /// returning the selected `(input, stream index)` pairs in output order.
    pub fn resolve(&self, streams_per_input: &[Vec<StreamDescriptor>]) -> Vec<(usize, u32)> {
        let mut selected: Vec<(usize, u32)> = Vec::new();
        for directive in &self.maps {
            match directive {
                MapDirective::Include { input, selector } => {
                    let Some(streams) = streams_per_input.get(*input) else {
                        continue;
                    };
                    selected.extend(
                        streams
                            .iter()
                            .filter(|s| selector.matches(s))
                            .map(|s| (*input, s.index)),
                    );
                }
                MapDirective::Exclude { input, selector } => {
                    let Some(streams) = streams_per_input.get(*input) else {
                        continue;
                    };
                    selected.retain(|(i, index)| {
                        *i != *input
                            || !streams
                                .iter()
                                .any(|s| s.index == *index && selector.matches(s))
                    });
                }
            }
        }
        selected
    }
}
