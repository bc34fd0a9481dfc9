//! Route definitions: one parameterized description per feature.

use serde::Serialize;
use serde_json::{Map, Value};
use std::borrow::Cow;

use super::template::PromptTemplate;
use crate::error::RouteError;
use crate::extract::{Extractor, FallbackPolicy, SchemaDescriptor, ValidationOutcome};
use crate::llm::{CompletionOptions, Message};

/// How a route reads the model's completion.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseFormat {
    /// The completion carries a JSON object
    Json,
    /// The whole completion is plain text stored under `field`
    Text { field: String },
}

/// Everything needed to serve one route: input shape, prompt, output
/// shape, fallback and failure policy.
#[derive(Debug, Clone)]
pub struct RouteSpec {
    pub name: String,
    pub description: String,
    pub input: SchemaDescriptor,
    pub system: Option<String>,
    pub prompt: PromptTemplate,
    pub response: ResponseFormat,
    pub options: CompletionOptions,
    extractor: Extractor,
    choices: Option<ChoiceBinding>,
}

/// An output enum field whose legal values a request may replace.
#[derive(Debug, Clone, PartialEq)]
struct ChoiceBinding {
    output_field: String,
    input_field: String,
}

/// Public listing of a route
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteSummary {
    pub name: String,
    pub description: String,
    pub policy: FallbackPolicy,
    pub inputs: Vec<String>,
}

impl RouteSpec {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        prompt: PromptTemplate,
        output: SchemaDescriptor,
        fallback: Value,
        policy: FallbackPolicy,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input: SchemaDescriptor::default(),
            system: None,
            prompt,
            response: ResponseFormat::Json,
            options: CompletionOptions::default(),
            extractor: Extractor::new(output, &fallback, policy),
            choices: None,
        }
    }

    /// Let the request's `input_field` (an array of strings) replace the
    /// allowed values of `output_field`.
    pub fn with_choices_from(mut self, output_field: impl Into<String>, input_field: impl Into<String>) -> Self {
        self.choices = Some(ChoiceBinding {
            output_field: output_field.into(),
            input_field: input_field.into(),
        });
        self
    }

    pub fn with_input(mut self, input: SchemaDescriptor) -> Self {
        self.input = input;
        self
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }

    /// Treat the completion as plain text stored under `field`
    pub fn text_response(mut self, field: impl Into<String>) -> Self {
        self.response = ResponseFormat::Text { field: field.into() };
        self
    }

    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    /// The extractor for one validated request. Routes with request-supplied
    /// choices get an extractor whose enum field is narrowed to them.
    pub fn extractor_for(&self, vars: &Map<String, Value>) -> Cow<'_, Extractor> {
        let Some(binding) = &self.choices else {
            return Cow::Borrowed(&self.extractor);
        };
        let choices: Vec<String> = vars
            .get(&binding.input_field)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default();
        if choices.is_empty() {
            return Cow::Borrowed(&self.extractor);
        }

        let mut output = self.output().clone();
        match output.field_mut(&binding.output_field) {
            Some(field) => field.allowed = Some(choices),
            None => return Cow::Borrowed(&self.extractor),
        }
        Cow::Owned(Extractor::new(output, self.extractor.fallback(), self.policy()))
    }

    pub fn output(&self) -> &SchemaDescriptor {
        self.extractor.schema()
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.extractor.policy()
    }

    pub fn summary(&self) -> RouteSummary {
        RouteSummary {
            name: self.name.clone(),
            description: self.description.clone(),
            policy: self.policy(),
            inputs: self.input.fields().iter().map(|f| f.name.clone()).collect(),
        }
    }

    /// Problems in the route's own declaration: shapes nothing satisfies and
    /// prompt placeholders that no input field fills.
    pub fn contradictions(&self) -> Vec<String> {
        let mut found: Vec<String> = self
            .input
            .contradictions()
            .into_iter()
            .map(|c| format!("input {c}"))
            .chain(self.output().contradictions().into_iter().map(|c| format!("output {c}")))
            .collect();
        for name in self.prompt.variables() {
            if self.input.field(name).is_none() {
                found.push(format!("prompt placeholder {name} is not an input field"));
            }
        }
        found
    }

    /// Validate a request body against the route's input descriptor.
    pub fn validate_input(&self, body: &Value) -> Result<Map<String, Value>, RouteError> {
        match self.input.validate(body) {
            ValidationOutcome::Valid(Value::Object(map)) => Ok(map),
            ValidationOutcome::Valid(_) => Ok(Map::new()),
            ValidationOutcome::Invalid(violations) => Err(RouteError::InvalidInput(violations)),
        }
    }

    /// Chat messages for a validated request
    pub fn messages(&self, vars: &Map<String, Value>) -> Vec<Message> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &self.system {
            messages.push(Message::system(system.clone()));
        }
        messages.push(Message::user(self.prompt.render(vars)));
        messages
    }
}
