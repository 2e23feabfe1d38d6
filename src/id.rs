use crate::{Error, FieldError, WithId};
use core::marker::PhantomData;
use std::collections::{hash_map::Entry, HashMap};

/// Typed Id over a [Collection]
///
/// An `Id<T>` can only be obtained from a [Collection] holding the key, so a
/// reference stored as an `Id<T>` was resolved when the object was read.
#[derive(Derivative, Serialize)]
#[derivative(Debug, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
#[serde(transparent)]
pub struct Id<T> {
    id: String,
    #[serde(skip)]
    #[derivative(Debug(bound = ""))]
    #[derivative(Debug = "ignore")]
    #[derivative(Clone(bound = ""))]
    #[derivative(Eq(bound = ""))]
    #[derivative(PartialEq(bound = ""))]
    #[derivative(Ord(bound = ""))]
    #[derivative(PartialOrd(bound = ""))]
    #[derivative(Hash(bound = ""))]
    _phantom: PhantomData<T>,
}

impl<T> Id<T> {
    fn must_exists(s: String) -> Id<T> {
        Id {
            id: s,
            _phantom: PhantomData,
        }
    }

    /// get as str
    pub fn as_str(&self) -> &str {
        self
    }
}

impl<T> std::ops::Deref for Id<T> {
    type Target = str;
    fn deref(&self) -> &str {
        &self.id
    }
}

impl<T> std::fmt::Display for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Collection with typed Ids
///
/// A slot can be a placeholder: the id is known (and can be referenced) but the
/// object itself was not retained. This happens for bulky objects in dry-run mode.
#[derive(Derivative, Serialize)]
#[derivative(Debug(bound = "T: std::fmt::Debug"), PartialEq(bound = "T: PartialEq"))]
pub struct Collection<T>(HashMap<Id<T>, Option<T>>);

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Collection(HashMap::default())
    }
}

impl<T: WithId> Collection<T> {
    /// Inserts an object, failing if its id is already taken
    pub(crate) fn insert(&mut self, o: T) -> Result<Id<T>, FieldError> {
        let id = Id::must_exists(o.id().to_owned());
        match self.0.entry(id.clone()) {
            Entry::Occupied(_) => Err(FieldError::duplicate(T::ID_FIELD, o.id())),
            Entry::Vacant(e) => {
                e.insert(Some(o));
                Ok(id)
            }
        }
    }
}

impl<T> Collection<T> {
    /// Returns the typed id if an object (or a placeholder) with this raw id exists
    pub fn get_id(&self, raw_id: &str) -> Option<Id<T>> {
        let id = Id::must_exists(raw_id.to_owned());
        if self.0.contains_key(&id) {
            Some(id)
        } else {
            None
        }
    }

    /// The retained object, `None` if unknown or if only a placeholder is left
    pub fn get(&self, id: &Id<T>) -> Option<&T> {
        self.0.get(id).and_then(Option::as_ref)
    }

    /// Same as [Collection::get] with a raw id
    pub fn get_by_str(&self, raw_id: &str) -> Option<&T> {
        self.get(&Id::must_exists(raw_id.to_owned()))
    }

    pub(crate) fn get_mut(&mut self, id: &Id<T>) -> Option<&mut T> {
        self.0.get_mut(id).and_then(Option::as_mut)
    }

    pub(crate) fn entry_or_insert_with(
        &mut self,
        raw_id: &str,
        f: impl FnOnce() -> T,
    ) -> Option<&mut T> {
        self.0
            .entry(Id::must_exists(raw_id.to_owned()))
            .or_insert_with(|| Some(f()))
            .as_mut()
    }

    pub(crate) fn remove(&mut self, id: &Id<T>) -> Option<T> {
        self.0.remove(id).flatten()
    }

    /// Drops the data of every object, keeping their ids resolvable
    pub(crate) fn clear_data(&mut self) {
        for slot in self.0.values_mut() {
            *slot = None;
        }
    }

    /// Is there an object or a placeholder with this id
    pub fn contains(&self, id: &Id<T>) -> bool {
        self.0.contains_key(id)
    }

    /// Is this id known, but without its data
    pub fn is_placeholder(&self, raw_id: &str) -> bool {
        matches!(self.0.get(&Id::must_exists(raw_id.to_owned())), Some(None))
    }

    /// Number of ids, placeholders included
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Is there no id at all
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All known ids, placeholders included
    pub fn ids(&self) -> impl Iterator<Item = &Id<T>> {
        self.0.keys()
    }

    /// Iterates over the retained objects
    pub fn iter(&self) -> impl Iterator<Item = (&Id<T>, &T)> {
        self.0
            .iter()
            .filter_map(|(id, slot)| slot.as_ref().map(|o| (id, o)))
    }

    /// Like [Collection::get] but with an error naming the id
    pub fn try_get(&self, raw_id: &str) -> Result<&T, Error> {
        self.get_by_str(raw_id)
            .ok_or_else(|| Error::ReferenceError(raw_id.to_owned()))
    }
}

impl<T> std::ops::Index<&Id<T>> for Collection<T> {
    type Output = T;

    fn index(&self, id: &Id<T>) -> &T {
        match self.get(id) {
            Some(o) => o,
            None => panic!("no retained object with id {}", id.as_str()),
        }
    }
}
