use crate::InitError;

/// A builder slot that accepts exactly one write.
#[derive(Debug, Clone)]
pub(crate) struct WriteOnce<T> {
    field: &'static str,
    value: Option<T>,
}

impl<T> WriteOnce<T> {
    pub(crate) const fn new(field: &'static str) -> Self {
        Self { field, value: None }
    }

    /// Store `value`, failing if the slot was already written.
    pub(crate) fn set(&mut self, value: T, element: &str) -> Result<(), InitError> {
        if self.value.is_some() {
            return Err(InitError::already_initialized(self.field, element));
        }
        self.value = Some(value);
        Ok(())
    }

    pub(crate) fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub(crate) fn is_set(&self) -> bool {
        self.value.is_some()
    }

    pub(crate) fn into_inner(self) -> Option<T> {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_write_fails() {
        let mut slot = WriteOnce::new("end line");
        assert!(!slot.is_set());
        assert!(slot.set(3, "foo").is_ok());
        assert_eq!(
            slot.set(4, "foo"),
            Err(InitError::already_initialized("end line", "foo"))
        );
        assert_eq!(slot.get(), Some(&3));
        assert_eq!(slot.into_inner(), Some(3));
    }
}
