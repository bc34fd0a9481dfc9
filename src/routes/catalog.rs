//! Built-in routes.
//!
//! Each feature is one [`RouteSpec`]: the prompt, the shape the answer must
//! have, and whether a bad answer degrades to a fallback or is reported.

use anyhow::{bail, Result};
use serde_json::json;

use super::spec::{RouteSpec, RouteSummary};
use super::template::PromptTemplate;
use crate::extract::{FallbackPolicy, FieldKind, FieldSpec, SchemaDescriptor};
use crate::llm::CompletionOptions;

const MAX_TEXT_CHARS: usize = 12_000;

const JSON_ONLY: &str = "Do not include any explanation, markdown formatting, or code block markers. Return ONLY the JSON object.";

/// The set of routes a server exposes, in listing order.
#[derive(Debug, Clone)]
pub struct RouteRegistry {
    routes: Vec<RouteSpec>,
}

impl RouteRegistry {
    pub fn new(routes: Vec<RouteSpec>) -> Self {
        Self { routes }
    }

    /// All built-in routes
    pub fn builtin() -> Self {
        Self::new(vec![
            sentiment(),
            summarize(),
            entities(),
            keywords(),
            classify(),
            translate(),
            detect_language(),
            meal_plan(),
            career(),
            build_advice(),
        ])
    }

    /// Reject routes whose declarations can't be satisfied, so a broken
    /// route fails at startup instead of on its first request.
    pub fn validate(&self) -> Result<()> {
        for route in &self.routes {
            let problems = route.contradictions();
            if !problems.is_empty() {
                bail!("Route '{}' is misdeclared: {}", route.name, problems.join("; "));
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&RouteSpec> {
        self.routes.iter().find(|r| r.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteSpec> {
        self.routes.iter()
    }

    pub fn summaries(&self) -> Vec<RouteSummary> {
        self.routes.iter().map(RouteSpec::summary).collect()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

fn text_input() -> FieldSpec {
    FieldSpec::required("text", FieldKind::String).length(1, MAX_TEXT_CHARS)
}

fn string_list(name: &str, required: bool) -> FieldSpec {
    let field = if required {
        FieldSpec::required(name, FieldKind::Array)
    } else {
        FieldSpec::optional(name, FieldKind::Array)
    };
    field.items(FieldSpec::item(FieldKind::String))
}

/// Sentiment with a signed score and a confidence.
pub fn sentiment() -> RouteSpec {
    let prompt = PromptTemplate::new(format!(
        r#"Analyze the sentiment of the following text.

Respond with a JSON object with these exact fields:
{{
  "sentiment": "positive" | "negative" | "neutral",
  "score": <number between -1 and 1>,
  "confidence": <number between 0 and 1>,
  "analysis": "<one sentence explaining the sentiment>"
}}

{JSON_ONLY}

Text: "{{{{text}}}}""#
    ));

    let output = SchemaDescriptor::new(vec![
        FieldSpec::required("sentiment", FieldKind::String)
            .one_of(&["positive", "negative", "neutral"])
            .ignore_case(),
        FieldSpec::required("score", FieldKind::Number).range(-1.0, 1.0),
        FieldSpec::required("confidence", FieldKind::Number).range(0.0, 1.0),
        FieldSpec::optional("analysis", FieldKind::String),
    ]);

    RouteSpec::new(
        "sentiment",
        "Classify the sentiment of a text",
        prompt,
        output,
        json!({"sentiment": "neutral", "score": 0, "confidence": 0.5}),
        FallbackPolicy::Degrade,
    )
    .with_input(SchemaDescriptor::new(vec![text_input()]))
    .with_options(CompletionOptions::default().with_temperature(0.2).json())
}

/// Plain-text summary; an empty answer is an error, not a fallback.
pub fn summarize() -> RouteSpec {
    let prompt = PromptTemplate::new(
        r#"Summarize the following text clearly and concisely in no more than {{max_words|100}} words. Focus on the main ideas and key points only.

Text:
"{{text}}"

Return only the summary, without any extra explanation or introduction."#,
    );

    let output = SchemaDescriptor::new(vec![FieldSpec::required("summary", FieldKind::String)]);

    RouteSpec::new(
        "summarize",
        "Summarize a text in plain prose",
        prompt,
        output,
        json!({}),
        FallbackPolicy::Surface,
    )
    .with_input(SchemaDescriptor::new(vec![
        text_input(),
        FieldSpec::optional("max_words", FieldKind::Integer).range(10.0, 1000.0),
    ]))
    .with_system("You are a concise summarizer.")
    .with_options(CompletionOptions::default().with_temperature(0.3))
    .text_response("summary")
}

/// Named entities; an unusable answer degrades to an empty list.
pub fn entities() -> RouteSpec {
    let prompt = PromptTemplate::new(format!(
        r#"Extract named entities from the following text.

Respond with a JSON object in this format:
{{
  "entities": [
    {{ "text": "<entity name>", "type": "<entity type>", "confidence": <number between 0 and 1> }}
  ]
}}

Entity types must be one of: person, organization, location, date, other.
{JSON_ONLY}

Text: "{{{{text}}}}""#
    ));

    let entity = SchemaDescriptor::new(vec![
        FieldSpec::required("text", FieldKind::String),
        FieldSpec::required("type", FieldKind::String)
            .one_of(&["person", "organization", "location", "date", "other"])
            .ignore_case(),
        FieldSpec::optional("confidence", FieldKind::Number).range(0.0, 1.0),
    ]);
    let output = SchemaDescriptor::new(vec![FieldSpec::required("entities", FieldKind::Array)
        .items(FieldSpec::item(FieldKind::Object).fields(entity))]);

    RouteSpec::new(
        "entities",
        "Extract named entities",
        prompt,
        output,
        json!({"entities": []}),
        FallbackPolicy::Degrade,
    )
    .with_input(SchemaDescriptor::new(vec![text_input()]))
    .with_options(CompletionOptions::default().with_temperature(0.1).json())
}

/// Ranked keywords; an unusable answer degrades to an empty list.
pub fn keywords() -> RouteSpec {
    let prompt = PromptTemplate::new(format!(
        r#"Extract the {{{{limit|10}}}} most important keywords from the following text.

Respond with a JSON object in this format:
{{
  "keywords": [
    {{ "text": "<keyword>", "relevance": <number between 0 and 1> }}
  ]
}}

{JSON_ONLY}

Text: "{{{{text}}}}""#
    ));

    let keyword = SchemaDescriptor::new(vec![
        FieldSpec::required("text", FieldKind::String),
        FieldSpec::required("relevance", FieldKind::Number).range(0.0, 1.0),
    ]);
    let output = SchemaDescriptor::new(vec![FieldSpec::required("keywords", FieldKind::Array)
        .items(FieldSpec::item(FieldKind::Object).fields(keyword))]);

    RouteSpec::new(
        "keywords",
        "Extract ranked keywords",
        prompt,
        output,
        json!({"keywords": []}),
        FallbackPolicy::Degrade,
    )
    .with_input(SchemaDescriptor::new(vec![
        text_input(),
        FieldSpec::optional("limit", FieldKind::Integer).range(1.0, 50.0),
    ]))
    .with_options(CompletionOptions::default().with_temperature(0.1).json())
}

const DEFAULT_CATEGORIES: [&str; 9] = [
    "technology",
    "business",
    "health",
    "entertainment",
    "sports",
    "politics",
    "science",
    "education",
    "other",
];

/// Single-label classification. Callers may supply their own categories,
/// which then become the only legal answers.
pub fn classify() -> RouteSpec {
    let prompt = PromptTemplate::new(format!(
        r#"Classify the following text into exactly one of these categories: {{{{categories|{}}}}}.

Respond with a JSON object in this format:
{{
  "category": "<one of the categories above>",
  "confidence": <number between 0 and 1>
}}

{JSON_ONLY}

Text: "{{{{text}}}}""#,
        DEFAULT_CATEGORIES.join(", ")
    ));

    let output = SchemaDescriptor::new(vec![
        FieldSpec::required("category", FieldKind::String)
            .one_of(&DEFAULT_CATEGORIES)
            .ignore_case(),
        FieldSpec::required("confidence", FieldKind::Number).range(0.0, 1.0),
    ]);

    RouteSpec::new(
        "classify",
        "Classify a text into one category",
        prompt,
        output,
        json!({"category": "other", "confidence": 0}),
        FallbackPolicy::Degrade,
    )
    .with_input(SchemaDescriptor::new(vec![
        text_input(),
        string_list("categories", false).length(2, 20),
    ]))
    .with_choices_from("category", "categories")
    .with_options(CompletionOptions::default().with_temperature(0.1).json())
}

/// Plain-text translation. A missing translation is an error.
pub fn translate() -> RouteSpec {
    let prompt = PromptTemplate::new(
        r#"Translate the following text from {{source_language|its original language}} to {{target_language}}. Preserve the meaning, tone and formatting.

Text:
"{{text}}"

Return only the translated text, without quotes, notes or explanations."#,
    );

    let output = SchemaDescriptor::new(vec![FieldSpec::required("translation", FieldKind::String)]);

    RouteSpec::new(
        "translate",
        "Translate a text into another language",
        prompt,
        output,
        json!({}),
        FallbackPolicy::Surface,
    )
    .with_input(SchemaDescriptor::new(vec![
        text_input(),
        FieldSpec::optional("source_language", FieldKind::String).length(1, 40),
        FieldSpec::required("target_language", FieldKind::String).length(1, 40),
    ]))
    .with_system("You are a professional translator.")
    .with_options(CompletionOptions::default().with_temperature(0.2))
    .text_response("translation")
}

/// Language identification; degrades to "unknown" with zero confidence.
pub fn detect_language() -> RouteSpec {
    let prompt = PromptTemplate::new(format!(
        r#"Identify the language the following text is written in.

Respond with a JSON object in this format:
{{
  "language": "<English name of the language>",
  "code": "<ISO 639-1 code, e.g. en>",
  "confidence": <number between 0 and 1>
}}

{JSON_ONLY}

Text: "{{{{text}}}}""#
    ));

    let output = SchemaDescriptor::new(vec![
        FieldSpec::required("language", FieldKind::String).length(1, 60),
        FieldSpec::optional("code", FieldKind::String).length(2, 3),
        FieldSpec::required("confidence", FieldKind::Number).range(0.0, 1.0),
    ]);

    RouteSpec::new(
        "detect-language",
        "Detect the language of a text",
        prompt,
        output,
        json!({"language": "unknown", "confidence": 0}),
        FallbackPolicy::Degrade,
    )
    .with_input(SchemaDescriptor::new(vec![text_input()]))
    .with_options(CompletionOptions::default().with_temperature(0.0).json())
}

fn meal() -> SchemaDescriptor {
    SchemaDescriptor::new(vec![
        FieldSpec::required("name", FieldKind::String),
        FieldSpec::required("calories", FieldKind::Integer).range(0.0, 5000.0),
    ])
}

/// Multi-day meal plan. A half-built plan is useless, so failures surface.
pub fn meal_plan() -> RouteSpec {
    let prompt = PromptTemplate::new(
        r#"Please generate a {{number_of_days}}-day meal plan based on the following requirements:
- Meals per day: {{number_of_meals_per_day|3}}
- Target daily calories: {{calorie_goal_per_day|Not specified}}
- Dietary restrictions: {{dietary_restrictions|None}}
- Preferred cuisines: {{preferred_cuisines|Any}}
- Disliked ingredients: {{disliked_ingredients|None}}
- Include snacks: {{include_snacks|false}}
- Protein goal (grams/day): {{protein_goal_grams|Not specified}}
- Fat goal (grams/day): {{fat_goal_grams|Not specified}}
- Carb goal (grams/day): {{carb_goal_grams|Not specified}}

Provide the output STRICTLY as a JSON object with a single root key "meal_plan".
"meal_plan" is an array with one object per day. Each day object has a "day" number (integer) and "breakfast", "lunch" and "dinner" objects.
Each meal is an object with "name" (string) and "calories" (integer, estimated).
If snacks are included, add a "snacks" array of meal objects to the day object.

Example day with snacks:
{
    "day": 1,
    "breakfast": { "name": "Scrambled Eggs with Spinach", "calories": 350 },
    "lunch": { "name": "Grilled Chicken Salad", "calories": 500 },
    "dinner": { "name": "Baked Salmon with Roasted Vegetables", "calories": 600 },
    "snacks": [ { "name": "Greek Yogurt with Berries", "calories": 150 } ]
}

Do not include any explanations or introductory text outside the main JSON object."#,
    );

    let day = SchemaDescriptor::new(vec![
        FieldSpec::required("day", FieldKind::Integer).range(1.0, 14.0),
        FieldSpec::required("breakfast", FieldKind::Object).fields(meal()),
        FieldSpec::required("lunch", FieldKind::Object).fields(meal()),
        FieldSpec::required("dinner", FieldKind::Object).fields(meal()),
        FieldSpec::optional("snacks", FieldKind::Array)
            .items(FieldSpec::item(FieldKind::Object).fields(meal())),
    ]);
    let output = SchemaDescriptor::new(vec![FieldSpec::required("meal_plan", FieldKind::Array)
        .length(1, 14)
        .items(FieldSpec::item(FieldKind::Object).fields(day))]);

    let input = SchemaDescriptor::new(vec![
        FieldSpec::required("number_of_days", FieldKind::Integer).range(1.0, 14.0),
        FieldSpec::optional("number_of_meals_per_day", FieldKind::Integer).range(1.0, 6.0),
        FieldSpec::optional("include_snacks", FieldKind::Boolean),
        FieldSpec::optional("calorie_goal_per_day", FieldKind::Integer).range(800.0, 6000.0),
        string_list("dietary_restrictions", false),
        string_list("preferred_cuisines", false),
        string_list("disliked_ingredients", false),
        FieldSpec::optional("protein_goal_grams", FieldKind::Integer).range(0.0, 1000.0),
        FieldSpec::optional("fat_goal_grams", FieldKind::Integer).range(0.0, 1000.0),
        FieldSpec::optional("carb_goal_grams", FieldKind::Integer).range(0.0, 1000.0),
    ])
    .strict();

    RouteSpec::new(
        "meal-plan",
        "Generate a multi-day meal plan",
        prompt,
        output,
        json!({}),
        FallbackPolicy::Surface,
    )
    .with_input(input)
    .with_options(CompletionOptions::default().with_temperature(0.5).json())
}

/// Career recommendations; degrades to broadly applicable entry-level paths.
pub fn career() -> RouteSpec {
    let prompt = PromptTemplate::new(format!(
        r#"You are a career guidance expert helping college students and recent graduates.
Analyze the following profile and recommend careers that fit it.

PROFILE:
- Skills: {{{{skills}}}}
- Interests: {{{{interests|Open to suggestions}}}}
- Education: {{{{education|Not specified}}}}
- Years of work experience: {{{{experience_years|0}}}}

Respond with a JSON object in this format:
{{
  "recommendations": [
    {{
      "title": "<job title>",
      "match_score": <integer between 0 and 100>,
      "reasons": ["<why this fits the profile>"],
      "skills_to_learn": ["<skill>"]
    }}
  ],
  "summary": "<two sentences about the profile>"
}}

Give between 1 and 5 recommendations, best match first.
{JSON_ONLY}"#
    ));

    let recommendation = SchemaDescriptor::new(vec![
        FieldSpec::required("title", FieldKind::String).length(1, 200),
        FieldSpec::required("match_score", FieldKind::Number).range(0.0, 100.0),
        string_list("reasons", true),
        string_list("skills_to_learn", true),
    ]);
    let output = SchemaDescriptor::new(vec![
        FieldSpec::required("recommendations", FieldKind::Array)
            .length(1, 10)
            .items(FieldSpec::item(FieldKind::Object).fields(recommendation)),
        FieldSpec::optional("summary", FieldKind::String),
    ]);

    let fallback = json!({
        "recommendations": [
            {
                "title": "Junior Software Developer",
                "match_score": 70,
                "reasons": ["Entry-level development roles are in steady demand and reward problem solving."],
                "skills_to_learn": ["Git", "REST APIs", "Cloud fundamentals"]
            },
            {
                "title": "Data Analyst Trainee",
                "match_score": 65,
                "reasons": ["Data analysis skills transfer across finance, retail and technology."],
                "skills_to_learn": ["SQL", "Spreadsheet modelling", "Data visualization"]
            },
            {
                "title": "Digital Marketing Assistant",
                "match_score": 60,
                "reasons": ["Digital marketing suits people who combine creativity with communication."],
                "skills_to_learn": ["Content creation", "Web analytics", "Social media management"]
            }
        ],
        "summary": "General recommendations; a personalised analysis was not available."
    });

    RouteSpec::new(
        "career",
        "Recommend careers for a skills profile",
        prompt,
        output,
        fallback,
        FallbackPolicy::Degrade,
    )
    .with_input(SchemaDescriptor::new(vec![
        string_list("skills", true).length(1, 50),
        string_list("interests", true),
        FieldSpec::optional("education", FieldKind::String).length(1, 500),
        FieldSpec::optional("experience_years", FieldKind::Integer).range(0.0, 60.0),
    ]))
    .with_options(CompletionOptions::default().with_temperature(0.6).json())
}

/// Item build advice for a game champion. Exactly six items or nothing.
pub fn build_advice() -> RouteSpec {
    let prompt = PromptTemplate::new(format!(
        r#"You are a League of Legends build expert. Recommend a build for the champion "{{{{champion}}}}" facing the lane opponent "{{{{opponent|unknown}}}}" and the enemy team: {{{{enemy_team|unknown}}}}.
Prioritize countering the lane opponent while considering the overall enemy team composition.

Respond with a JSON object with this structure:
{{
  "recommended_build": ["Item1", "Item2", "Item3", "Item4", "Item5", "Item6"],
  "explanation": {{ "Item1": "Reason for Item1" }},
  "alternative_builds": [
    {{ "situation": "Situation 1", "build": ["AltItem1", "AltItem2", "AltItem3", "AltItem4", "AltItem5", "AltItem6"] }}
  ],
  "build_process": {{
    "early_game": "Items and strategy for the early game",
    "mid_game": "Items and strategy for the mid game",
    "late_game": "Items and strategy for the late game"
  }}
}}

"recommended_build" must contain exactly 6 completed items, including one pair of boots. Explain every item.
{JSON_ONLY}"#
    ));

    let six_items = || {
        FieldSpec::required("build", FieldKind::Array)
            .length(6, 6)
            .items(FieldSpec::item(FieldKind::String).length(1, 100))
    };
    let alternative = SchemaDescriptor::new(vec![
        FieldSpec::required("situation", FieldKind::String),
        six_items(),
    ]);
    let process = SchemaDescriptor::new(vec![
        FieldSpec::required("early_game", FieldKind::String),
        FieldSpec::required("mid_game", FieldKind::String),
        FieldSpec::required("late_game", FieldKind::String),
    ]);
    let output = SchemaDescriptor::new(vec![
        FieldSpec { name: "recommended_build".to_string(), ..six_items() },
        FieldSpec::required("explanation", FieldKind::Object),
        FieldSpec::optional("alternative_builds", FieldKind::Array)
            .length(0, 3)
            .items(FieldSpec::item(FieldKind::Object).fields(alternative)),
        FieldSpec::required("build_process", FieldKind::Object).fields(process),
    ]);

    RouteSpec::new(
        "build-advice",
        "Recommend a six-item champion build",
        prompt,
        output,
        json!({}),
        FallbackPolicy::Surface,
    )
    .with_input(SchemaDescriptor::new(vec![
        FieldSpec::required("champion", FieldKind::String).length(1, 40),
        FieldSpec::optional("opponent", FieldKind::String).length(1, 40),
        string_list("enemy_team", false).length(0, 5),
    ]))
    .with_options(CompletionOptions::default().with_temperature(0.4).json())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    #[test]
    fn test_builtin_names_unique() {
        let registry = RouteRegistry::builtin();
        let mut names: Vec<&str> = registry.iter().map(|r| r.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), registry.len());
        assert!(registry.get("sentiment").is_some());
        assert!(registry.get("nope").is_none());
    }

    #[test]
    fn test_degrade_fallbacks_conform() {
        for route in RouteRegistry::builtin().iter() {
            if route.policy() == FallbackPolicy::Degrade {
                assert!(
                    route.output().check_fallback(route.extractor().fallback()).is_ok(),
                    "fallback for {} does not conform",
                    route.name
                );
            }
        }
        assert_eq!(
            sentiment().extractor().fallback(),
            &json!({"sentiment": "neutral", "score": 0, "confidence": 0.5})
        );
    }

    #[test]
    fn test_prompts_render_without_leftover_placeholders() {
        let body = json!({
            "text": "The launch went well.",
            "number_of_days": 2,
            "skills": ["Rust"],
            "interests": [],
            "target_language": "French",
            "champion": "Ahri"
        });
        let vars: Map<String, serde_json::Value> = body.as_object().cloned().unwrap();
        for route in RouteRegistry::builtin().iter() {
            let prompt = route.prompt.render(&vars);
            assert!(!prompt.contains("{{"), "{} left a placeholder: {}", route.name, prompt);
        }
    }

    #[test]
    fn test_builtin_routes_are_well_declared() {
        let registry = RouteRegistry::builtin();
        assert!(registry.validate().is_ok());
        for route in registry.iter() {
            assert!(route.contradictions().is_empty(), "{}: {:?}", route.name, route.contradictions());
        }

        let broken = RouteRegistry::new(vec![RouteSpec::new(
            "broken",
            "Broken",
            PromptTemplate::new("{{missing}}"),
            SchemaDescriptor::default(),
            json!({}),
            FallbackPolicy::Surface,
        )]);
        let err = broken.validate().unwrap_err().to_string();
        assert!(err.contains("prompt placeholder missing is not an input field"), "{err}");
    }

    #[test]
    fn test_classify_uses_request_categories() {
        let route = classify();
        let prompt = route.prompt.render(&Map::new());
        assert!(prompt.contains("categories: technology, business,"));

        let vars = route
            .validate_input(&json!({"text": "Refund my order", "categories": ["billing", "shipping"]}))
            .unwrap();
        assert!(route.prompt.render(&vars).contains("categories: billing, shipping."));
        let extractor = route.extractor_for(&vars);
        assert_eq!(
            extractor.run(r#"{"category": "Billing", "confidence": 0.9}"#).result(),
            Some(&json!({"category": "billing", "confidence": 0.9}))
        );
        let fallback = extractor.run(r#"{"category": "sports", "confidence": 0.9}"#);
        assert!(fallback.is_degraded());
        assert_eq!(fallback.result(), Some(&json!({"category": "billing", "confidence": 0})));

        assert!(route.validate_input(&json!({"text": "x", "categories": ["only"]})).is_err());
    }

    #[test]
    fn test_translate_requires_target_language() {
        let route = translate();
        let err = route.validate_input(&json!({"text": "Bonjour"})).unwrap_err();
        assert_eq!(err.details(), vec!["missing field target_language"]);

        let vars = route
            .validate_input(&json!({"text": "Bonjour", "target_language": "English"}))
            .unwrap();
        let messages = route.messages(&vars);
        assert!(messages[1].content.starts_with("Translate the following text from its original language to English."));
    }

    #[test]
    fn test_detect_language_degrades() {
        let route = detect_language();
        assert_eq!(
            route.extractor().run("It looks like Spanish to me.").result(),
            Some(&json!({"language": "unknown", "confidence": 0}))
        );
        assert_eq!(
            route.extractor().run(r#"{"language": "Spanish", "code": "es", "confidence": 0.97}"#).result(),
            Some(&json!({"language": "Spanish", "code": "es", "confidence": 0.97}))
        );
    }

    #[test]
    fn test_sentiment_prompt_keeps_json_example() {
        let vars = json!({"text": "great"}).as_object().cloned().unwrap();
        let prompt = sentiment().prompt.render(&vars);
        assert!(prompt.contains("{\n  \"sentiment\""));
        assert!(prompt.ends_with("Text: \"great\""));
    }

    #[test]
    fn test_meal_plan_input_is_strict() {
        let route = meal_plan();
        assert!(route.validate_input(&json!({"number_of_days": 3})).is_ok());
        let err = route
            .validate_input(&json!({"number_of_days": 30, "pizza": true}))
            .unwrap_err();
        assert_eq!(
            err.details(),
            vec!["number_of_days out of range [1,14]", "unknown field pizza"]
        );
    }

    #[test]
    fn test_build_advice_requires_six_items() {
        let route = build_advice();
        let outcome = route.output().validate(&json!({
            "recommended_build": ["a", "b", "c"],
            "explanation": {},
            "build_process": {"early_game": "x", "mid_game": "y", "late_game": "z"}
        }));
        assert_eq!(outcome.messages(), vec!["recommended_build must have length in [6,6]"]);
    }
}
