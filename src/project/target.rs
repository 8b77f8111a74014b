//! Translated project model.

use serde::Serialize;

/// How a sprite turns to face its direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum RotationStyle {
    #[default]
    #[serde(rename = "all around")]
    AllAround,
    #[serde(rename = "left-right")]
    LeftRight,
    #[serde(rename = "don't rotate")]
    DontRotate,
}

impl RotationStyle {
    /// Map a legacy rotation-style symbol. Anything unrecognised, including
    /// a missing value, is [`RotationStyle::AllAround`].
    pub fn from_legacy(style: Option<&str>) -> Self {
        match style {
            Some("normal") => RotationStyle::AllAround,
            Some("leftRight") => RotationStyle::LeftRight,
            Some("none") => RotationStyle::DontRotate,
            _ => RotationStyle::AllAround,
        }
    }
}

/// Whether a variable holds one value or a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    Scalar,
    /// Produced by list variables. List watchers are not decoded yet, so
    /// translation never emits one.
    List,
}

/// Value of a scalar variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

/// A named variable of a target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variable {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: VariableKind,
    pub value: ScalarValue,
}

impl Variable {
    /// A scalar variable.
    pub fn scalar(name: impl Into<String>, value: ScalarValue) -> Self {
        Self {
            name: name.into(),
            kind: VariableKind::Scalar,
            value,
        }
    }
}

/// A top-level block stack. Block bodies are not decoded, so translation
/// never produces one; the type fixes the shape downstream code expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Script {
    pub x: f64,
    pub y: f64,
}

/// The stage or a sprite.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub name: String,
    pub is_stage: bool,
    pub variables: Vec<Variable>,
    pub scripts: Vec<Script>,
    pub visible: bool,
    /// Percent of the costume's natural size.
    pub size: i32,
    pub rotation_style: RotationStyle,
    /// Degrees; 90 faces right.
    pub direction: f64,
    pub is_draggable: bool,
    #[serde(rename = "tempoBPM", skip_serializing_if = "Option::is_none")]
    pub tempo_bpm: Option<f64>,
}

impl Target {
    /// A target with the modern defaults for every property a legacy record
    /// may not carry.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_stage: false,
            variables: Vec::new(),
            scripts: Vec::new(),
            visible: true,
            size: 100,
            rotation_style: RotationStyle::AllAround,
            direction: 90.0,
            is_draggable: false,
            tempo_bpm: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn rotation_styles() {
        assert_eq!(
            RotationStyle::from_legacy(Some("normal")),
            RotationStyle::AllAround
        );
        assert_eq!(
            RotationStyle::from_legacy(Some("leftRight")),
            RotationStyle::LeftRight
        );
        assert_eq!(
            RotationStyle::from_legacy(Some("none")),
            RotationStyle::DontRotate
        );
        for other in [Some("LeftRight"), Some(""), Some("don't rotate"), None] {
            assert_eq!(RotationStyle::from_legacy(other), RotationStyle::AllAround);
        }
    }

    #[test]
    fn serializes_like_the_modern_model() {
        let mut stage = Target::new("Stage");
        stage.is_stage = true;
        stage.tempo_bpm = Some(60.0);
        stage
            .variables
            .push(Variable::scalar("score", ScalarValue::Number(3.0)));

        assert_eq!(
            serde_json::to_value(&stage).unwrap(),
            json!({
                "name": "Stage",
                "isStage": true,
                "variables": [{"name": "score", "type": "scalar", "value": 3.0}],
                "scripts": [],
                "visible": true,
                "size": 100,
                "rotationStyle": "all around",
                "direction": 90.0,
                "isDraggable": false,
                "tempoBPM": 60.0,
            })
        );

        let sprite = Target::new("Sprite1");
        let value = serde_json::to_value(&sprite).unwrap();
        assert!(value.get("tempoBPM").is_none());
    }

    #[test]
    fn variable_kinds() {
        assert_eq!(serde_json::to_value(VariableKind::Scalar).unwrap(), json!("scalar"));
        assert_eq!(serde_json::to_value(VariableKind::List).unwrap(), json!("list"));
    }
}
