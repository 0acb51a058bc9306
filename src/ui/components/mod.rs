mod employee_picker;

pub use employee_picker::EmployeePicker;

/// Outcome of offering a key to a component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResult<T> {
  /// Consumed, nothing for the parent to do
  Handled,
  /// Consumed and produced an event for the parent
  Event(T),
  /// Not consumed, the parent handles it
  NotHandled,
}
