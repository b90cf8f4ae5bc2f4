//! Escrow capsules for objects that pass through the Safe during execution.

use soroban_sdk::{BytesN, Env, Vec};

use crate::errors::SafeError;

/// Objects allowed to leave custody for good. Each may be withdrawn once.
pub struct Removable {
    objects: Vec<BytesN<32>>,
}

impl Removable {
    pub fn new(objects: Vec<BytesN<32>>) -> Self {
        Removable { objects }
    }

    pub fn withdraw(&mut self, object_id: &BytesN<32>) -> Result<BytesN<32>, SafeError> {
        let index = self
            .objects
            .first_index_of(object_id)
            .ok_or(SafeError::NotRemovable)?;
        self.objects.remove(index);
        Ok(object_id.clone())
    }

    pub fn remaining(&self) -> u32 {
        self.objects.len()
    }
}

/// Objects lent out for the duration of one execution. Every borrowed object
/// has to be put back before the capsule can be destroyed, and dropping an
/// undestroyed capsule panics.
pub struct Borrowable {
    objects: Vec<BytesN<32>>,
    borrowed: Vec<BytesN<32>>,
    destroyed: bool,
}

impl Borrowable {
    pub fn new(env: &Env, objects: Vec<BytesN<32>>) -> Self {
        Borrowable {
            objects,
            borrowed: Vec::new(env),
            destroyed: false,
        }
    }

    pub fn borrow(&mut self, object_id: &BytesN<32>) -> Result<BytesN<32>, SafeError> {
        let index = self
            .objects
            .first_index_of(object_id)
            .ok_or(SafeError::NotBorrowable)?;
        self.objects.remove(index);
        self.borrowed.push_back(object_id.clone());
        Ok(object_id.clone())
    }

    pub fn put_back(&mut self, object_id: BytesN<32>) -> Result<(), SafeError> {
        let index = self
            .borrowed
            .first_index_of(&object_id)
            .ok_or(SafeError::NotBorrowable)?;
        self.borrowed.remove(index);
        self.objects.push_back(object_id);
        Ok(())
    }

    pub fn outstanding(&self) -> u32 {
        self.borrowed.len()
    }

    /// Releases the capsule, returning the objects it held.
    pub fn destroy(mut self) -> Result<Vec<BytesN<32>>, SafeError> {
        self.destroyed = true;
        if !self.borrowed.is_empty() {
            return Err(SafeError::OutstandingBorrow);
        }
        Ok(self.objects.clone())
    }
}

impl Drop for Borrowable {
    fn drop(&mut self) {
        if !self.destroyed {
            panic!("borrowable dropped without being destroyed");
        }
    }
}
