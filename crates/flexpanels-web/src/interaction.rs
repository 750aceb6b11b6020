//! Pointer, touch and keyboard resizing.
//!
//! [`ResizeController`] turns host input events into layout updates. A
//! pointer or touch gesture is a small state machine:
//!
//! ```text
//! Idle --down/start--> Dragging --move--> Dragging --up/end--> Idle
//!                          \--cancel--> Idle (layout restored)
//! ```
//!
//! Every move previews a layout by writing custom properties only; the
//! release commits through the snapshot store. Keyboard input has no drag
//! phase: each handled key commits immediately.
//!
//! Each call returns a [`ResizeDispatch`] describing what happened and what
//! the host must do (attach or detach document listeners, call
//! `preventDefault`), together with a structured log record.

use flexpanels_layout::{ConstraintHit, GroupLayout, Orientation, StructureError, calculate_new_layout};
use flexpanels_store::SnapshotStore;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::apply::{apply_layout_to_group, clear_flex_properties};
use crate::constants::{
    CLASS_CONSTRAINED_MAX, CLASS_CONSTRAINED_MIN, CLASS_HORIZONTAL, CLASS_RESIZER,
    CLASS_RESIZING, CLASS_VERTICAL, DRAG_BODY_CLASSES,
};
use crate::dom::{DomHost, is_rtl};
use crate::error::ResizeError;
use crate::extract::{ExtractedGroup, extract_state, group_for_resizer};

/// Default arrow-key step, in pixels.
pub const DEFAULT_KEY_STEP: f64 = 10.0;
/// Arrow-key step with Shift held.
pub const DEFAULT_SHIFT_KEY_STEP: f64 = 50.0;
/// Arrow-key step with Ctrl or Meta held.
pub const DEFAULT_FINE_KEY_STEP: f64 = 1.0;
/// `PointerEvent.button` value of the main button.
pub const PRIMARY_BUTTON: i16 = 0;

/// Keyboard step sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeConfig {
    pub step: f64,
    pub shift_step: f64,
    pub fine_step: f64,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            step: DEFAULT_KEY_STEP,
            shift_step: DEFAULT_SHIFT_KEY_STEP,
            fine_step: DEFAULT_FINE_KEY_STEP,
        }
    }
}

impl ResizeConfig {
    /// Step for a key press. Ctrl/Meta wins over Shift.
    #[must_use]
    pub fn step_for(&self, modifiers: KeyModifiers) -> f64 {
        if modifiers.ctrl || modifiers.meta {
            self.fine_step
        } else if modifiers.shift {
            self.shift_step
        } else {
            self.step
        }
    }
}

/// Modifier keys held during a key press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl KeyModifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        meta: false,
    };
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        meta: false,
    };
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        meta: false,
    };
}

/// Viewport coordinates of a pointer or touch point (`clientX`/`clientY`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Coordinate along `orientation`'s main axis.
    #[must_use]
    pub const fn along(self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Horizontal => self.x,
            Orientation::Vertical => self.y,
        }
    }
}

/// Input family driving a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeSource {
    Pointer,
    Touch,
    Keyboard,
}

/// Document-level listeners a gesture needs while it is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListenerSet {
    /// `pointermove`, `pointerup`, `pointercancel`.
    Pointer,
    /// `touchmove` (non-passive), `touchend`, `touchcancel`.
    Touch,
}

/// Listener change the host must perform on `document`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListenerCommand {
    Attach(ListenerSet),
    Detach(ListenerSet),
}

/// Input event recorded for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizePhase {
    PointerDown,
    PointerMove,
    PointerUp,
    PointerCancel,
    TouchStart,
    TouchMove,
    TouchEnd,
    TouchCancel,
    KeyDown,
}

/// Why an input event had no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeIgnoredReason {
    NotPrimaryPointer,
    ButtonNotAllowed,
    DragInProgress,
    NoActiveDrag,
    /// A pointer event arrived during a touch gesture, or the reverse.
    SourceMismatch,
    KeyNotHandled,
}

/// Outcome category of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeLogOutcome {
    DragStarted,
    Previewed,
    Committed,
    Cancelled,
    Ignored(ResizeIgnoredReason),
}

/// Structured record of one dispatch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResizeLogEntry {
    pub phase: ResizePhase,
    /// Monotonic per controller; `None` for ignored events.
    pub sequence: Option<u64>,
    pub group_id: Option<String>,
    pub resizer_index: Option<usize>,
    /// Signed main-axis offset passed to the layout algorithm.
    pub offset: Option<f64>,
    pub constraint: Option<ConstraintHit>,
    pub outcome: ResizeLogOutcome,
}

/// Layout-level effect of one dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum ResizeEffect {
    DragStarted { resizer_index: usize },
    /// Custom properties were written; nothing was committed.
    Previewed(GroupLayout),
    /// The layout was committed to the snapshot store.
    Committed(GroupLayout),
    /// The gesture ended without a commit and the last committed layout was
    /// restored.
    Cancelled,
}

/// Result of one input dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeDispatch {
    pub effect: Option<ResizeEffect>,
    pub listeners: Option<ListenerCommand>,
    /// Whether the host should call `preventDefault()` on the event.
    pub prevent_default: bool,
    pub log: ResizeLogEntry,
}

impl ResizeDispatch {
    fn ignored(phase: ResizePhase, reason: ResizeIgnoredReason) -> Self {
        Self {
            effect: None,
            listeners: None,
            prevent_default: false,
            log: ResizeLogEntry {
                phase,
                sequence: None,
                group_id: None,
                resizer_index: None,
                offset: None,
                constraint: None,
                outcome: ResizeLogOutcome::Ignored(reason),
            },
        }
    }

    #[must_use]
    pub const fn is_ignored(&self) -> bool {
        matches!(self.log.outcome, ResizeLogOutcome::Ignored(_))
    }
}

#[derive(Debug, Clone)]
struct DragSession<E> {
    source: ResizeSource,
    /// Start coordinate along the group's main axis.
    start: f64,
    group: ExtractedGroup<E>,
    resizer_index: usize,
    /// Horizontal offsets are mirrored in right-to-left groups.
    rtl: bool,
}

impl<E> DragSession<E> {
    fn offset(&self, position: PointerPosition) -> f64 {
        let orientation = self.group.state.orientation;
        let offset = position.along(orientation) - self.start;
        if self.rtl && orientation == Orientation::Horizontal {
            -offset
        } else {
            offset
        }
    }

    fn listener_set(&self) -> ListenerSet {
        match self.source {
            ResizeSource::Touch => ListenerSet::Touch,
            _ => ListenerSet::Pointer,
        }
    }
}

/// Per-document resize state machine. At most one gesture is active.
#[derive(Debug, Clone)]
pub struct ResizeController<E> {
    config: ResizeConfig,
    active: Option<DragSession<E>>,
    next_sequence: u64,
}

impl<E: Clone + PartialEq> Default for ResizeController<E> {
    fn default() -> Self {
        Self::new(ResizeConfig::default())
    }
}

fn orientation_class(orientation: Orientation) -> &'static str {
    match orientation {
        Orientation::Horizontal => CLASS_HORIZONTAL,
        Orientation::Vertical => CLASS_VERTICAL,
    }
}

fn clear_drag_classes<H: DomHost>(host: &mut H) {
    for class in DRAG_BODY_CLASSES {
        host.set_body_class(class, false);
    }
}

impl<E: Clone + PartialEq> ResizeController<E> {
    #[must_use]
    pub const fn new(config: ResizeConfig) -> Self {
        Self {
            config,
            active: None,
            next_sequence: 1,
        }
    }

    #[must_use]
    pub const fn config(&self) -> ResizeConfig {
        self.config
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// The group being dragged, if any.
    #[must_use]
    pub fn active_group(&self) -> Option<&E> {
        self.active.as_ref().map(|session| &session.group.element)
    }

    fn bump_sequence(&mut self) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        sequence
    }

    fn log(
        &mut self,
        phase: ResizePhase,
        group_id: &str,
        resizer_index: usize,
        offset: Option<f64>,
        constraint: Option<ConstraintHit>,
        outcome: ResizeLogOutcome,
    ) -> ResizeLogEntry {
        ResizeLogEntry {
            phase,
            sequence: Some(self.bump_sequence()),
            group_id: Some(group_id.to_owned()),
            resizer_index: Some(resizer_index),
            offset,
            constraint,
            outcome,
        }
    }

    /// Primary-button pointer-down on a resizer.
    pub fn pointer_down<H: DomHost<Element = E>>(
        &mut self,
        host: &mut H,
        resizer: &E,
        position: PointerPosition,
        button: i16,
        is_primary: bool,
    ) -> Result<ResizeDispatch, ResizeError> {
        let phase = ResizePhase::PointerDown;
        if !is_primary {
            return Ok(ResizeDispatch::ignored(phase, ResizeIgnoredReason::NotPrimaryPointer));
        }
        if button != PRIMARY_BUTTON {
            return Ok(ResizeDispatch::ignored(phase, ResizeIgnoredReason::ButtonNotAllowed));
        }
        self.start_drag(host, resizer, position, ResizeSource::Pointer, phase)
    }

    pub fn pointer_move<H: DomHost<Element = E>>(
        &mut self,
        host: &mut H,
        store: &SnapshotStore,
        position: PointerPosition,
    ) -> Result<ResizeDispatch, ResizeError> {
        self.preview(host, store, position, ResizeSource::Pointer, ResizePhase::PointerMove)
    }

    pub fn pointer_up<H: DomHost<Element = E>>(
        &mut self,
        host: &mut H,
        store: &SnapshotStore,
        position: PointerPosition,
    ) -> Result<ResizeDispatch, ResizeError> {
        self.finish(host, store, position, ResizeSource::Pointer, ResizePhase::PointerUp)
    }

    pub fn pointer_cancel<H: DomHost<Element = E>>(
        &mut self,
        host: &mut H,
        store: &SnapshotStore,
    ) -> Result<ResizeDispatch, ResizeError> {
        self.cancel(host, store, ResizeSource::Pointer, ResizePhase::PointerCancel)
    }

    /// Touch-start on a resizer; `touch` is the first touch point.
    pub fn touch_start<H: DomHost<Element = E>>(
        &mut self,
        host: &mut H,
        resizer: &E,
        touch: PointerPosition,
    ) -> Result<ResizeDispatch, ResizeError> {
        self.start_drag(host, resizer, touch, ResizeSource::Touch, ResizePhase::TouchStart)
    }

    pub fn touch_move<H: DomHost<Element = E>>(
        &mut self,
        host: &mut H,
        store: &SnapshotStore,
        touch: PointerPosition,
    ) -> Result<ResizeDispatch, ResizeError> {
        self.preview(host, store, touch, ResizeSource::Touch, ResizePhase::TouchMove)
    }

    /// Touch-end; `touch` is the first changed touch point.
    pub fn touch_end<H: DomHost<Element = E>>(
        &mut self,
        host: &mut H,
        store: &SnapshotStore,
        touch: PointerPosition,
    ) -> Result<ResizeDispatch, ResizeError> {
        self.finish(host, store, touch, ResizeSource::Touch, ResizePhase::TouchEnd)
    }

    pub fn touch_cancel<H: DomHost<Element = E>>(
        &mut self,
        host: &mut H,
        store: &SnapshotStore,
    ) -> Result<ResizeDispatch, ResizeError> {
        self.cancel(host, store, ResizeSource::Touch, ResizePhase::TouchCancel)
    }

    /// Arrow key on a focused resizer. Up/Left move the resizer back,
    /// Down/Right forward; horizontal steps are mirrored when the resizer is
    /// right-to-left. Other keys are ignored.
    pub fn key_down<H: DomHost<Element = E>>(
        &mut self,
        host: &mut H,
        store: &SnapshotStore,
        resizer: &E,
        key: &str,
        modifiers: KeyModifiers,
    ) -> Result<ResizeDispatch, ResizeError> {
        let phase = ResizePhase::KeyDown;
        let group_element = group_for_resizer(host, resizer)?;
        let group = extract_state(host, &group_element)?;
        let step = self.config.step_for(modifiers);

        let offset = match (group.orientation(), key) {
            (Orientation::Vertical, "ArrowUp") | (Orientation::Horizontal, "ArrowLeft") => -step,
            (Orientation::Vertical, "ArrowDown") | (Orientation::Horizontal, "ArrowRight") => step,
            _ => return Ok(ResizeDispatch::ignored(phase, ResizeIgnoredReason::KeyNotHandled)),
        };
        let offset = if group.orientation() == Orientation::Horizontal && is_rtl(host, resizer) {
            -offset
        } else {
            offset
        };

        let resizer_index = group
            .resizer_index(resizer)
            .ok_or(StructureError::UnknownResizer)?;
        let layout = calculate_new_layout(&group.state, resizer_index, offset)?;
        apply_layout_to_group(host, store, &group, &layout, true)?;
        debug!(
            group = %group.state.id,
            resizer_index,
            offset,
            key,
            "keyboard resize committed"
        );

        let log = self.log(
            phase,
            &group.state.id,
            resizer_index,
            Some(offset),
            layout.constraint,
            ResizeLogOutcome::Committed,
        );
        Ok(ResizeDispatch {
            effect: Some(ResizeEffect::Committed(layout)),
            listeners: None,
            prevent_default: true,
            log,
        })
    }

    fn start_drag<H: DomHost<Element = E>>(
        &mut self,
        host: &mut H,
        resizer: &E,
        position: PointerPosition,
        source: ResizeSource,
        phase: ResizePhase,
    ) -> Result<ResizeDispatch, ResizeError> {
        if self.active.is_some() {
            return Ok(ResizeDispatch::ignored(phase, ResizeIgnoredReason::DragInProgress));
        }

        if let Some(focused) = host.active_element()
            && host.has_class(&focused, CLASS_RESIZER)
        {
            host.blur(&focused);
        }

        let group_element = group_for_resizer(host, resizer)?;
        let group = extract_state(host, &group_element)?;
        let resizer_index = group
            .resizer_index(resizer)
            .ok_or(StructureError::UnknownResizer)?;
        let orientation = group.orientation();
        let session = DragSession {
            source,
            start: position.along(orientation),
            rtl: is_rtl(host, &group_element),
            group,
            resizer_index,
        };

        host.set_body_class(CLASS_RESIZING, true);
        host.set_body_class(orientation_class(orientation), true);
        debug!(
            group = %session.group.state.id,
            resizer_index,
            source = ?source,
            "resize drag started"
        );

        let listeners = ListenerCommand::Attach(session.listener_set());
        let log = self.log(
            phase,
            &session.group.state.id,
            resizer_index,
            None,
            None,
            ResizeLogOutcome::DragStarted,
        );
        self.active = Some(session);
        Ok(ResizeDispatch {
            effect: Some(ResizeEffect::DragStarted { resizer_index }),
            listeners: Some(listeners),
            prevent_default: true,
            log,
        })
    }

    fn session_for(
        &self,
        source: ResizeSource,
        phase: ResizePhase,
    ) -> Result<&DragSession<E>, ResizeDispatch> {
        match &self.active {
            None => Err(ResizeDispatch::ignored(phase, ResizeIgnoredReason::NoActiveDrag)),
            Some(session) if session.source != source => Err(ResizeDispatch::ignored(
                phase,
                ResizeIgnoredReason::SourceMismatch,
            )),
            Some(session) => Ok(session),
        }
    }

    fn preview<H: DomHost<Element = E>>(
        &mut self,
        host: &mut H,
        store: &SnapshotStore,
        position: PointerPosition,
        source: ResizeSource,
        phase: ResizePhase,
    ) -> Result<ResizeDispatch, ResizeError> {
        let session = match self.session_for(source, phase) {
            Ok(session) => session,
            Err(ignored) => return Ok(ignored),
        };
        let offset = session.offset(position);
        let layout = calculate_new_layout(&session.group.state, session.resizer_index, offset)?;

        host.set_body_class(
            CLASS_CONSTRAINED_MIN,
            layout.constraint == Some(ConstraintHit::Min),
        );
        host.set_body_class(
            CLASS_CONSTRAINED_MAX,
            layout.constraint == Some(ConstraintHit::Max),
        );
        apply_layout_to_group(host, store, &session.group, &layout, false)?;
        trace!(
            group = %session.group.state.id,
            offset,
            constraint = ?layout.constraint,
            "resize drag preview"
        );

        let group_id = session.group.state.id.clone();
        let resizer_index = session.resizer_index;
        let log = self.log(
            phase,
            &group_id,
            resizer_index,
            Some(offset),
            layout.constraint,
            ResizeLogOutcome::Previewed,
        );
        Ok(ResizeDispatch {
            effect: Some(ResizeEffect::Previewed(layout)),
            listeners: None,
            prevent_default: true,
            log,
        })
    }

    fn finish<H: DomHost<Element = E>>(
        &mut self,
        host: &mut H,
        store: &SnapshotStore,
        position: PointerPosition,
        source: ResizeSource,
        phase: ResizePhase,
    ) -> Result<ResizeDispatch, ResizeError> {
        if let Err(ignored) = self.session_for(source, phase) {
            return Ok(ignored);
        }
        let Some(session) = self.active.take() else {
            return Ok(ResizeDispatch::ignored(phase, ResizeIgnoredReason::NoActiveDrag));
        };

        let offset = session.offset(position);
        let committed = calculate_new_layout(&session.group.state, session.resizer_index, offset)
            .map_err(ResizeError::from)
            .and_then(|layout| {
                apply_layout_to_group(host, store, &session.group, &layout, true)?;
                Ok(layout)
            });
        clear_drag_classes(host);
        let layout = committed?;
        debug!(
            group = %session.group.state.id,
            resizer_index = session.resizer_index,
            offset,
            constraint = ?layout.constraint,
            "resize drag committed"
        );

        let log = self.log(
            phase,
            &session.group.state.id,
            session.resizer_index,
            Some(offset),
            layout.constraint,
            ResizeLogOutcome::Committed,
        );
        Ok(ResizeDispatch {
            effect: Some(ResizeEffect::Committed(layout)),
            listeners: Some(ListenerCommand::Detach(session.listener_set())),
            prevent_default: true,
            log,
        })
    }

    /// End the gesture without committing and put back the group's last
    /// committed flex values (or the authored defaults when it has none).
    fn cancel<H: DomHost<Element = E>>(
        &mut self,
        host: &mut H,
        store: &SnapshotStore,
        source: ResizeSource,
        phase: ResizePhase,
    ) -> Result<ResizeDispatch, ResizeError> {
        if let Err(ignored) = self.session_for(source, phase) {
            return Ok(ignored);
        }
        let Some(session) = self.active.take() else {
            return Ok(ResizeDispatch::ignored(phase, ResizeIgnoredReason::NoActiveDrag));
        };
        clear_drag_classes(host);

        let config = store.config();
        let element = &session.group.element;
        let snapshot = store.get_snapshot(&session.group.state.id)?;
        for panel in session.group.state.panels() {
            match snapshot
                .as_ref()
                .and_then(|snapshot| snapshot.flex_value(&panel.child_id))
            {
                Some(value) => {
                    host.set_style_property(element, &config.child_flex_property(&panel.child_id), value);
                }
                None => clear_flex_properties(host, &config, element, [panel.child_id.as_str()]),
            }
        }
        debug!(group = %session.group.state.id, "resize drag cancelled");

        let log = self.log(
            phase,
            &session.group.state.id,
            session.resizer_index,
            None,
            None,
            ResizeLogOutcome::Cancelled,
        );
        Ok(ResizeDispatch {
            effect: Some(ResizeEffect::Cancelled),
            listeners: Some(ListenerCommand::Detach(session.listener_set())),
            prevent_default: false,
            log,
        })
    }
}
