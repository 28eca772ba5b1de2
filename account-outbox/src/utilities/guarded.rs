// 2022-2024 (c) Copyright Contributors to the GOSH DAO. All rights reserved.
//

use std::sync::Arc;

use parking_lot::RwLock;

pub trait AllowGuardedMut {
    fn inner_guarded_mut<F, T>(&mut self, action: F) -> T
    where
        F: FnOnce(&mut Self) -> T,
    {
        action(self)
    }
}

pub trait Guarded<Inner> {
    fn guarded<F, T>(&self, action: F) -> T
    where
        F: FnOnce(&Inner) -> T;
}

pub trait GuardedMut<Inner> {
    fn guarded_mut<F, T>(&self, action: F) -> T
    where
        F: FnOnce(&mut Inner) -> T;
}

// Accessors take the shared mode, mutators the exclusive mode. The guard
// never outlives the closure.
impl<Inner> Guarded<Inner> for Arc<RwLock<Inner>> {
    fn guarded<F, T>(&self, action: F) -> T
    where
        F: FnOnce(&Inner) -> T,
    {
        let guard = self.read();
        let result = action(&guard);
        drop(guard);
        result
    }
}

impl<Inner> GuardedMut<Inner> for Arc<RwLock<Inner>>
where
    Inner: AllowGuardedMut,
{
    fn guarded_mut<F, T>(&self, action: F) -> T
    where
        F: FnOnce(&mut Inner) -> T,
    {
        let mut guard = self.write();
        let result = <Inner as AllowGuardedMut>::inner_guarded_mut(&mut guard, action);
        drop(guard);
        result
    }
}
