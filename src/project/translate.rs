//! Object graph to project model.
//!
//! ## Target fields used
//! ```text
//! [ 4] flags          (int, bit 0 set = hidden)            sprite
//! [ 6] name           (string)                             both
//! [ 7] variables      (dictionary name -> value, or null)  both
//! [ 8] scripts        (array of stacks)                    both
//! [13] scale          (point, x used)                      sprite
//! [14] heading        (double, legacy orientation)         sprite
//! [15] rotation style (symbol)                             sprite
//! [18] tempo / drag   (double on stage, bool on sprite)    both, optional
//! [20] lists          (dictionary)                         both, optional
//! ```

use log::debug;

use super::target::{RotationStyle, ScalarValue, Script, Target, Variable};
use crate::object::class;
use crate::object::{Node, ObjectTable, Payload};
use crate::{Error, Result};

const NAME: usize = 6;
const VARIABLES: usize = 7;
const SCRIPTS: usize = 8;
const FLAGS: usize = 4;
const SCALE: usize = 13;
const HEADING: usize = 14;
const ROTATION_STYLE: usize = 15;
const TEMPO_OR_DRAGGABLE: usize = 18;
const LISTS: usize = 20;

/// Legacy headings are measured 270 degrees away from modern ones.
const HEADING_OFFSET: f64 = 270.0;

/// Walks a resolved content table and builds the target list.
pub struct ProjectTranslator<'t> {
    table: &'t ObjectTable,
}

impl<'t> ProjectTranslator<'t> {
    /// Translate entries of `table`, which must be a content table.
    pub fn new(table: &'t ObjectTable) -> Self {
        Self { table }
    }

    /// The stage followed by every sprite record, in table order.
    pub fn parse_project(&self) -> Result<Vec<Target>> {
        let root = self.table.root().ok_or(Error::EmptyTable)?;
        if root.class_id != class::STAGE {
            return Err(Error::NotStage {
                class_id: root.class_id,
            });
        }

        let mut targets = vec![self.parse_stage(root)?];
        for entry in self.table.iter().filter(|n| n.class_id == class::SPRITE) {
            targets.push(self.parse_sprite(entry)?);
        }
        Ok(targets)
    }

    /// Translate the stage record.
    pub fn parse_stage(&self, entry: &'t Node) -> Result<Target> {
        if entry.class_id != class::STAGE {
            return Err(Error::NotStage {
                class_id: entry.class_id,
            });
        }
        let mut stage = self.parse_target(entry)?;
        stage.is_stage = true;

        if let Some(tempo) = self.field(entry, TEMPO_OR_DRAGGABLE) {
            stage.tempo_bpm = Some(
                tempo
                    .as_f64()
                    .ok_or(Error::Structure("stage tempo is not a number"))?,
            );
        }
        if let Some(lists) = self.field(entry, LISTS) {
            stage.variables.extend(self.build_lists(lists));
        }

        debug!("stage '{}': {} variables", stage.name, stage.variables.len());
        Ok(stage)
    }

    /// Translate one sprite record.
    pub fn parse_sprite(&self, entry: &'t Node) -> Result<Target> {
        let mut sprite = self.parse_target(entry)?;

        let flags = self
            .require(entry, FLAGS)?
            .as_i64()
            .ok_or(Error::Structure("sprite flags are not an integer"))?;
        sprite.visible = flags & 1 == 0;

        let scale = self
            .require(entry, SCALE)?
            .elements()
            .and_then(|xy| xy.first())
            .and_then(|x| self.table.deref(x).as_f64())
            .ok_or(Error::Structure("sprite scale is not a point"))?;
        sprite.size = round_half_up(scale * 100.0) as i32;

        sprite.rotation_style = RotationStyle::from_legacy(
            self.field(entry, ROTATION_STYLE).and_then(Node::as_str),
        );

        let heading = self
            .require(entry, HEADING)?
            .as_f64()
            .ok_or(Error::Structure("sprite heading is not a number"))?;
        sprite.direction = round_half_up(heading * 1_000_000.0) / 1_000_000.0 - HEADING_OFFSET;

        if let Some(draggable) = self.field(entry, TEMPO_OR_DRAGGABLE) {
            sprite.is_draggable = draggable
                .as_bool()
                .ok_or(Error::Structure("sprite draggable flag is not a boolean"))?;
        }
        if let Some(lists) = self.field(entry, LISTS) {
            sprite.variables.extend(self.build_lists(lists));
        }

        debug!(
            "sprite '{}': size {}%, direction {}",
            sprite.name, sprite.size, sprite.direction
        );
        Ok(sprite)
    }

    /// Properties shared by the stage and sprites.
    fn parse_target(&self, entry: &'t Node) -> Result<Target> {
        let name = self
            .require(entry, NAME)?
            .as_str()
            .ok_or(Error::Structure("target name is not a string"))?;
        let mut target = Target::new(name);
        target.variables = self.build_vars(self.require(entry, VARIABLES)?)?;
        target.scripts = self.build_scripts(self.require(entry, SCRIPTS)?);
        Ok(target)
    }

    /// Scalar variables from alternating name/value entries. A trailing
    /// unpaired element is ignored.
    pub fn build_vars(&self, pairs: &'t Node) -> Result<Vec<Variable>> {
        if pairs.is_null() {
            return Ok(Vec::new());
        }
        let items = pairs
            .elements()
            .ok_or(Error::Structure("variables are not a collection"))?;
        items
            .chunks_exact(2)
            .map(|pair| -> Result<Variable> {
                let name = self
                    .table
                    .deref(&pair[0])
                    .as_str()
                    .ok_or(Error::Structure("variable name is not a string"))?;
                let value = scalar_value(self.table.deref(&pair[1]))?;
                Ok(Variable::scalar(name, value))
            })
            .collect()
    }

    /// List variables. List watchers are not decoded, so this is always
    /// empty.
    pub fn build_lists(&self, lists: &'t Node) -> Vec<Variable> {
        if let Some(items) = lists.elements()
            && !items.is_empty()
        {
            debug!("skipping {} list entries: list decoding unsupported", items.len() / 2);
        }
        Vec::new()
    }

    /// Scripts. Block bodies are not decoded, so this is always empty.
    pub fn build_scripts(&self, scripts: &'t Node) -> Vec<Script> {
        if let Some(stacks) = scripts.elements()
            && !stacks.is_empty()
        {
            debug!("skipping {} scripts: block decoding unsupported", stacks.len());
        }
        Vec::new()
    }

    fn field(&self, entry: &'t Node, index: usize) -> Option<&'t Node> {
        entry.fields().get(index).map(|f| self.table.deref(f))
    }

    fn require(&self, entry: &'t Node, index: usize) -> Result<&'t Node> {
        self.field(entry, index)
            .ok_or(Error::Structure("target record is missing a field"))
    }
}

fn scalar_value(node: &Node) -> Result<ScalarValue> {
    Ok(match &node.payload {
        Payload::Null => ScalarValue::Null,
        Payload::Bool(b) => ScalarValue::Bool(*b),
        Payload::Str(s) => ScalarValue::Text(s.clone()),
        _ => ScalarValue::Number(
            node.as_f64()
                .ok_or(Error::Structure("variable value is not a scalar"))?,
        ),
    })
}

/// Round to the nearest integer, halves towards positive infinity.
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}
