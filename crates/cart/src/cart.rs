use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use budbar_core::{Aggregate, AggregateRoot, DomainError, InquiryId, SessionId};
use budbar_events::Event;

use crate::line::{CartLine, checked_cart_total};

/// Aggregate root: the in-progress cart of one browsing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    id: SessionId,
    lines: Vec<CartLine>,
    version: u64,
}

impl Cart {
    pub fn empty(id: SessionId) -> Self {
        Self {
            id,
            lines: Vec::new(),
            version: 0,
        }
    }

    /// Rebuild a cart from previously saved lines.
    ///
    /// Lines go through the same events as live additions, so duplicate keys
    /// merge and zero-quantity lines are dropped. A line that would push the
    /// total out of range is dropped too.
    pub fn rehydrate(id: SessionId, saved: &[CartLine], occurred_at: DateTime<Utc>) -> Self {
        let mut cart = Cart::empty(id);
        for line in saved.iter().filter(|l| l.quantity > 0) {
            let key = line.key();
            let event = match cart.position_of(&key) {
                Some(index) => {
                    let mut merged = cart.lines[index].clone();
                    merged.quantity = merged.quantity.saturating_add(line.quantity);
                    if cart.ensure_total_fits(Some(index), &merged).is_err() {
                        continue;
                    }
                    CartEvent::QuantityChanged(QuantityChanged {
                        session_id: id,
                        index,
                        quantity: merged.quantity,
                        occurred_at,
                    })
                }
                None => {
                    if cart.ensure_total_fits(None, line).is_err() {
                        continue;
                    }
                    CartEvent::LineAdded(LineAdded {
                        session_id: id,
                        line: line.clone(),
                        occurred_at,
                    })
                }
            };
            cart.apply(&event);
        }
        cart
    }

    pub fn id_typed(&self) -> SessionId {
        self.id
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn position_of(&self, key: &crate::line::LineKey) -> Option<usize> {
        self.lines.iter().position(|l| l.has_key(key))
    }

    /// The cart total must stay representable once `candidate` replaces the
    /// line at `index` (or is appended when `index` is `None`).
    fn ensure_total_fits(
        &self,
        index: Option<usize>,
        candidate: &CartLine,
    ) -> Result<(), DomainError> {
        let others = self
            .lines
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != index)
            .map(|(_, line)| line);
        match checked_cart_total(others.chain(core::iter::once(candidate))) {
            Some(_) => Ok(()),
            None => Err(DomainError::invariant("cart total is out of range")),
        }
    }
}

impl AggregateRoot for Cart {
    type Id = SessionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddLine.
///
/// `line` is a fresh quote ([`CartLine::quote`]); its quantity is ignored, an
/// add always counts one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLine {
    pub session_id: SessionId,
    pub line: CartLine,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveLine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveLine {
    pub session_id: SessionId,
    pub index: usize,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SetQuantity. Zero or less removes the line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetQuantity {
    pub session_id: SessionId,
    pub index: usize,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Why a cart was emptied in one go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "inquiry_id")]
pub enum ClearReason {
    Submitted(InquiryId),
    Discarded,
}

/// Command: ClearCart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearCart {
    pub session_id: SessionId,
    pub reason: ClearReason,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartCommand {
    AddLine(AddLine),
    RemoveLine(RemoveLine),
    SetQuantity(SetQuantity),
    ClearCart(ClearCart),
}

/// Event: LineAdded (new key, quantity 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAdded {
    pub session_id: SessionId,
    pub line: CartLine,
    pub occurred_at: DateTime<Utc>,
}

/// Event: QuantityIncremented (existing key added again).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityIncremented {
    pub session_id: SessionId,
    pub index: usize,
    pub title: String,
    pub variant_name: String,
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: QuantityChanged (explicit quantity edit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityChanged {
    pub session_id: SessionId,
    pub index: usize,
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: LineRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRemoved {
    pub session_id: SessionId,
    pub index: usize,
    pub line: CartLine,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CartCleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartCleared {
    pub session_id: SessionId,
    pub reason: ClearReason,
    pub line_count: usize,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartEvent {
    LineAdded(LineAdded),
    QuantityIncremented(QuantityIncremented),
    QuantityChanged(QuantityChanged),
    LineRemoved(LineRemoved),
    CartCleared(CartCleared),
}

impl Event for CartEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CartEvent::LineAdded(_) => "cart.line_added",
            CartEvent::QuantityIncremented(_) => "cart.quantity_incremented",
            CartEvent::QuantityChanged(_) => "cart.quantity_changed",
            CartEvent::LineRemoved(_) => "cart.line_removed",
            CartEvent::CartCleared(_) => "cart.cleared",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CartEvent::LineAdded(e) => e.occurred_at,
            CartEvent::QuantityIncremented(e) => e.occurred_at,
            CartEvent::QuantityChanged(e) => e.occurred_at,
            CartEvent::LineRemoved(e) => e.occurred_at,
            CartEvent::CartCleared(e) => e.occurred_at,
        }
    }

    fn confirmation(&self) -> Option<String> {
        match self {
            CartEvent::LineAdded(e) => Some(added_message(&e.line.title, &e.line.variant_name)),
            CartEvent::QuantityIncremented(e) => Some(added_message(&e.title, &e.variant_name)),
            CartEvent::CartCleared(CartCleared {
                reason: ClearReason::Submitted(_),
                ..
            }) => Some("Inquiry submitted successfully! We'll contact you soon.".to_string()),
            _ => None,
        }
    }
}

fn added_message(title: &str, variant_name: &str) -> String {
    format!("Added {title} ({variant_name}) to inquiry")
}

impl Aggregate for Cart {
    type Command = CartCommand;
    type Event = CartEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CartEvent::LineAdded(e) => {
                let mut line = e.line.clone();
                line.quantity = line.quantity.max(1);
                self.lines.push(line);
            }
            CartEvent::QuantityIncremented(QuantityIncremented { index, quantity, .. })
            | CartEvent::QuantityChanged(QuantityChanged { index, quantity, .. }) => {
                if let Some(line) = self.lines.get_mut(*index) {
                    line.quantity = *quantity;
                }
            }
            CartEvent::LineRemoved(e) => {
                if e.index < self.lines.len() {
                    self.lines.remove(e.index);
                }
            }
            CartEvent::CartCleared(_) => {
                self.lines.clear();
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            CartCommand::AddLine(cmd) => self.handle_add_line(cmd),
            CartCommand::RemoveLine(cmd) => self.handle_remove_line(cmd),
            CartCommand::SetQuantity(cmd) => self.handle_set_quantity(cmd),
            CartCommand::ClearCart(cmd) => self.handle_clear(cmd),
        }
    }
}

impl Cart {
    fn ensure_session(&self, session_id: SessionId) -> Result<(), DomainError> {
        if self.id != session_id {
            return Err(DomainError::invariant("session_id mismatch"));
        }
        Ok(())
    }

    fn handle_add_line(&self, cmd: &AddLine) -> Result<Vec<CartEvent>, DomainError> {
        self.ensure_session(cmd.session_id)?;

        let key = cmd.line.key();
        if let Some(index) = self.position_of(&key) {
            let existing = &self.lines[index];
            let quantity = existing
                .quantity
                .checked_add(1)
                .ok_or_else(|| DomainError::invariant("line quantity overflow"))?;

            let mut bumped = existing.clone();
            bumped.quantity = quantity;
            self.ensure_total_fits(Some(index), &bumped)?;

            return Ok(vec![CartEvent::QuantityIncremented(QuantityIncremented {
                session_id: cmd.session_id,
                index,
                title: existing.title.clone(),
                variant_name: existing.variant_name.clone(),
                quantity,
                occurred_at: cmd.occurred_at,
            })]);
        }

        if cmd.line.variant_name.trim().is_empty() {
            return Err(DomainError::validation("variant name is required"));
        }

        let mut line = cmd.line.clone();
        line.quantity = 1;
        self.ensure_total_fits(None, &line)?;

        Ok(vec![CartEvent::LineAdded(LineAdded {
            session_id: cmd.session_id,
            line,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove_line(&self, cmd: &RemoveLine) -> Result<Vec<CartEvent>, DomainError> {
        self.ensure_session(cmd.session_id)?;

        // Indices come from what was last rendered; a stale one is a no-op.
        let Some(line) = self.lines.get(cmd.index) else {
            return Ok(vec![]);
        };

        Ok(vec![CartEvent::LineRemoved(LineRemoved {
            session_id: cmd.session_id,
            index: cmd.index,
            line: line.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_set_quantity(&self, cmd: &SetQuantity) -> Result<Vec<CartEvent>, DomainError> {
        self.ensure_session(cmd.session_id)?;

        if cmd.quantity <= 0 {
            return self.handle_remove_line(&RemoveLine {
                session_id: cmd.session_id,
                index: cmd.index,
                occurred_at: cmd.occurred_at,
            });
        }

        let Some(line) = self.lines.get(cmd.index) else {
            return Ok(vec![]);
        };

        let quantity = u32::try_from(cmd.quantity)
            .map_err(|_| DomainError::validation("quantity is too large"))?;

        if line.quantity == quantity {
            return Ok(vec![]);
        }

        let mut edited = line.clone();
        edited.quantity = quantity;
        self.ensure_total_fits(Some(cmd.index), &edited)?;

        Ok(vec![CartEvent::QuantityChanged(QuantityChanged {
            session_id: cmd.session_id,
            index: cmd.index,
            quantity,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_clear(&self, cmd: &ClearCart) -> Result<Vec<CartEvent>, DomainError> {
        self.ensure_session(cmd.session_id)?;

        Ok(vec![CartEvent::CartCleared(CartCleared {
            session_id: cmd.session_id,
            reason: cmd.reason,
            line_count: self.lines.len(),
            occurred_at: cmd.occurred_at,
        })])
    }
}
