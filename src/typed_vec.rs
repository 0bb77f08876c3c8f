/// Declares an index newtype together with an arena vector that can only be
/// indexed by it.
///
/// Every linked structure in the clipper (vertex rings, output rings, the
/// active edge list) stores its links as these indices, so a link into the
/// wrong arena is a type error instead of a silent bug.
macro_rules! typed_vec {
    ($(#[$meta:meta])* $vec_name:ident, $idx_name:ident, $dbg_prefix:expr) => {
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub(crate) struct $idx_name(pub(crate) usize);

        $(#[$meta])*
        #[derive(Clone)]
        pub(crate) struct $vec_name<T> {
            inner: Vec<T>,
        }

        impl std::fmt::Debug for $idx_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}_{}", $dbg_prefix, self.0)
            }
        }

        #[allow(dead_code)]
        impl<T> $vec_name<T> {
            /// Returns an iterator over all indices into this arena.
            pub fn indices(&self) -> impl Iterator<Item = $idx_name> {
                (0..self.inner.len()).map($idx_name)
            }

            /// The number of elements in the arena.
            pub fn len(&self) -> usize {
                self.inner.len()
            }

            /// Is the arena empty?
            pub fn is_empty(&self) -> bool {
                self.inner.is_empty()
            }

            /// Adds a new element, returning its index.
            pub fn push(&mut self, elt: T) -> $idx_name {
                self.inner.push(elt);
                $idx_name(self.inner.len() - 1)
            }

            /// Drops every element. Indices handed out earlier become dangling.
            pub fn clear(&mut self) {
                self.inner.clear();
            }

            /// Makes room for at least `additional` more elements.
            pub fn reserve(&mut self, additional: usize) {
                self.inner.reserve(additional);
            }

            /// Drops every element from `len` onwards.
            pub fn truncate(&mut self, len: usize) {
                self.inner.truncate(len);
            }

            /// Sorts in place. Indices handed out earlier refer to the new positions.
            pub fn sort_by(&mut self, compare: impl FnMut(&T, &T) -> std::cmp::Ordering) {
                self.inner.sort_by(compare);
            }

            /// Returns the element at `idx`, if it's in bounds.
            pub fn get(&self, idx: $idx_name) -> Option<&T> {
                self.inner.get(idx.0)
            }

            /// Returns an iterator over indices and elements.
            pub fn iter(&self) -> impl Iterator<Item = ($idx_name, &T)> + '_ {
                self.inner
                    .iter()
                    .enumerate()
                    .map(|(idx, t)| ($idx_name(idx), t))
            }
        }

        impl<T> Default for $vec_name<T> {
            fn default() -> Self {
                Self { inner: Vec::new() }
            }
        }

        impl<T> std::ops::Index<$idx_name> for $vec_name<T> {
            type Output = T;

            fn index(&self, index: $idx_name) -> &Self::Output {
                &self.inner[index.0]
            }
        }

        impl<T> std::ops::IndexMut<$idx_name> for $vec_name<T> {
            fn index_mut(&mut self, index: $idx_name) -> &mut T {
                &mut self.inner[index.0]
            }
        }

        impl<T: std::fmt::Debug> std::fmt::Debug for $vec_name<T> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                struct Entry<'a, T> {
                    idx: $idx_name,
                    inner: &'a T,
                }

                impl<T: std::fmt::Debug> std::fmt::Debug for Entry<'_, T> {
                    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                        write!(f, "{idx:?}: {inner:?}", idx = self.idx, inner = self.inner)
                    }
                }

                let mut list = f.debug_list();
                for (idx, inner) in self.iter() {
                    list.entry(&Entry { idx, inner });
                }
                list.finish()
            }
        }
    };
}
