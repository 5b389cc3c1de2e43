use tileworld_kernel::{World, WorldError};

/// An editing command that can be applied to the world and reversed.
///
/// Each command records the value it replaced, so undo is a plain re-apply
/// of the old value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditCommand {
    /// Set or clear the BLOCKED flag. Undo = restore the old state.
    SetBlocked { x: i32, y: i32, old: bool, new: bool },
    /// Change the overlay id. Undo = restore the old id.
    SetOverlay { x: i32, y: i32, old: u8, new: u8 },
    /// Paint one texel of a tile raster. Undo = restore the old texel.
    PaintTexel {
        x: i32,
        y: i32,
        tx: i32,
        ty: i32,
        old: u8,
        new: u8,
    },
}

impl EditCommand {
    /// Produce the inverse command (for undo).
    pub fn inverse(&self) -> Self {
        match *self {
            Self::SetBlocked { x, y, old, new } => Self::SetBlocked { x, y, old: new, new: old },
            Self::SetOverlay { x, y, old, new } => Self::SetOverlay { x, y, old: new, new: old },
            Self::PaintTexel { x, y, tx, ty, old, new } => Self::PaintTexel {
                x,
                y,
                tx,
                ty,
                old: new,
                new: old,
            },
        }
    }
}

/// Errors from edit operations.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error(transparent)]
    World(#[from] WorldError),
}

/// Editor with undo/redo support for non-destructive map authoring.
///
/// Applies tile edits through the `World` facade and tracks them on
/// undo/redo stacks; every operation is reversible.
#[derive(Default)]
pub struct Editor {
    undo_stack: Vec<EditCommand>,
    redo_stack: Vec<EditCommand>,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the BLOCKED flag at a world tile and push to the undo stack.
    pub fn set_blocked(&mut self, world: &mut World, x: i32, y: i32, blocked: bool) -> Result<(), EditError> {
        let old = world.set_blocked(x, y, blocked)?;
        self.push(EditCommand::SetBlocked { x, y, old, new: blocked });
        Ok(())
    }

    /// Set the overlay id at a world tile and push to the undo stack.
    pub fn set_overlay(&mut self, world: &mut World, x: i32, y: i32, v: u8) -> Result<(), EditError> {
        let old = world.set_overlay(x, y, v)?;
        self.push(EditCommand::SetOverlay { x, y, old, new: v });
        Ok(())
    }

    /// Paint a texel at a world tile and push to the undo stack.
    pub fn paint_texel(
        &mut self,
        world: &mut World,
        x: i32,
        y: i32,
        tx: i32,
        ty: i32,
        v: u8,
    ) -> Result<(), EditError> {
        let old = world.paint_texel(x, y, tx, ty, v)?;
        self.push(EditCommand::PaintTexel { x, y, tx, ty, old, new: v });
        Ok(())
    }

    fn push(&mut self, cmd: EditCommand) {
        self.undo_stack.push(cmd);
        self.redo_stack.clear();
    }

    /// Undo the last edit. Returns true if an operation was undone.
    pub fn undo(&mut self, world: &mut World) -> Result<bool, EditError> {
        let Some(cmd) = self.undo_stack.pop() else {
            return Ok(false);
        };
        apply(world, &cmd.inverse())?;
        self.redo_stack.push(cmd);
        Ok(true)
    }

    /// Redo the last undone edit. Returns true if an operation was redone.
    pub fn redo(&mut self, world: &mut World) -> Result<bool, EditError> {
        let Some(cmd) = self.redo_stack.pop() else {
            return Ok(false);
        };
        apply(world, &cmd)?;
        self.undo_stack.push(cmd);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}

fn apply(world: &mut World, cmd: &EditCommand) -> Result<(), WorldError> {
    match *cmd {
        EditCommand::SetBlocked { x, y, new, .. } => {
            world.set_blocked(x, y, new)?;
        }
        EditCommand::SetOverlay { x, y, new, .. } => {
            world.set_overlay(x, y, new)?;
        }
        EditCommand::PaintTexel { x, y, tx, ty, new, .. } => {
            world.paint_texel(x, y, tx, ty, new)?;
        }
    }
    Ok(())
}
