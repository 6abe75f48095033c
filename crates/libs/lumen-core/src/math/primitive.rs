//! Boilerplate shared by [`Vector`](super::Vector), [`Point`](super::Point)
//! and [`Normal`](super::Normal).
//!
//! The three types have the same storage and constructor surface, but each
//! of them is a distinct nominal type. Everything that only concerns the
//! storage is generated here; semantic arithmetic lives next to each type.

/// Implements the storage-level surface of a primitive wrapping an
/// `nalgebra::SVector`: constant constructors, conversions from and to the
/// storage, column-expression assignment, indexing, comparison, printing and
/// the `approx` traits, all delegated to the storage.
macro_rules! impl_storage {
    ($name:ident<$s:ident $(, const $n:ident: usize)?>, $dim:expr, $what:literal) => {
        impl<$s: $crate::math::Scalar $(, const $n: usize)?> $name<$s $(, $n)?> {
            /// Number of components.
            pub const DIM: usize = $dim;

            #[doc = concat!("Creates a ", $what, " with all components equal to `value`.")]
            #[inline]
            pub fn splat(value: $s) -> Self { Self(::nalgebra::SVector::from_element(value)) }

            #[doc = concat!("Creates a ", $what, " with all components set to zero.")]
            #[inline]
            pub fn zeros() -> Self { Self::splat(<$s as ::num_traits::Zero>::zero()) }

            #[doc = concat!("Creates a ", $what, " from any column-shaped matrix expression.")]
            ///
            /// This accepts views and the results of arithmetic on the
            /// storage type, so the primitive can take part in generic
            /// linear algebra without the expression knowing about it.
            #[inline]
            pub fn from_column<St>(
                column: &::nalgebra::Matrix<$s, ::nalgebra::Const<{ $dim }>, ::nalgebra::U1, St>,
            ) -> Self
            where
                St: ::nalgebra::Storage<$s, ::nalgebra::Const<{ $dim }>, ::nalgebra::U1>,
            {
                Self(column.clone_owned())
            }

            /// Overwrites all components with the given column expression.
            #[inline]
            pub fn assign<St>(
                &mut self,
                column: &::nalgebra::Matrix<$s, ::nalgebra::Const<{ $dim }>, ::nalgebra::U1, St>,
            ) where
                St: ::nalgebra::Storage<$s, ::nalgebra::Const<{ $dim }>, ::nalgebra::U1>,
            {
                self.0 = column.clone_owned();
            }

            /// Returns the underlying storage.
            #[inline]
            pub fn into_inner(self) -> ::nalgebra::SVector<$s, { $dim }> { self.0 }

            /// Returns a reference to the underlying storage.
            #[inline]
            pub fn as_inner(&self) -> &::nalgebra::SVector<$s, { $dim }> { &self.0 }

            /// Returns a mutable reference to the underlying storage.
            #[inline]
            pub fn as_inner_mut(&mut self) -> &mut ::nalgebra::SVector<$s, { $dim }> { &mut self.0 }

            /// Returns the components as a slice.
            #[inline]
            pub fn as_slice(&self) -> &[$s] { self.0.as_slice() }
        }

        impl<$s: $crate::math::Scalar $(, const $n: usize)?> Default for $name<$s $(, $n)?> {
            fn default() -> Self { Self::zeros() }
        }

        impl<$s: $crate::math::Scalar $(, const $n: usize)?> From<::nalgebra::SVector<$s, { $dim }>>
            for $name<$s $(, $n)?>
        {
            #[inline]
            fn from(storage: ::nalgebra::SVector<$s, { $dim }>) -> Self { Self(storage) }
        }

        impl<$s: $crate::math::Scalar $(, const $n: usize)?> From<$name<$s $(, $n)?>>
            for ::nalgebra::SVector<$s, { $dim }>
        {
            #[inline]
            fn from(value: $name<$s $(, $n)?>) -> Self { value.0 }
        }

        impl<$s: $crate::math::Scalar $(, const $n: usize)?> ::std::ops::Deref for $name<$s $(, $n)?> {
            type Target = ::nalgebra::SVector<$s, { $dim }>;

            #[inline]
            fn deref(&self) -> &Self::Target { &self.0 }
        }

        impl<$s: $crate::math::Scalar $(, const $n: usize)?> ::std::ops::DerefMut
            for $name<$s $(, $n)?>
        {
            #[inline]
            fn deref_mut(&mut self) -> &mut Self::Target { &mut self.0 }
        }

        impl<$s: $crate::math::Scalar $(, const $n: usize)?> ::std::ops::Index<usize>
            for $name<$s $(, $n)?>
        {
            type Output = $s;

            #[inline]
            fn index(&self, index: usize) -> &Self::Output { &self.0[index] }
        }

        impl<$s: $crate::math::Scalar $(, const $n: usize)?> ::std::ops::IndexMut<usize>
            for $name<$s $(, $n)?>
        {
            #[inline]
            fn index_mut(&mut self, index: usize) -> &mut Self::Output { &mut self.0[index] }
        }

        impl<$s: $crate::math::Scalar $(, const $n: usize)?> AsRef<[$s]> for $name<$s $(, $n)?> {
            fn as_ref(&self) -> &[$s] { self.0.as_slice() }
        }

        impl<$s: $crate::math::Scalar $(, const $n: usize)?> PartialEq for $name<$s $(, $n)?> {
            fn eq(&self, other: &Self) -> bool { self.0 == other.0 }
        }

        impl<$s: $crate::math::Scalar $(, const $n: usize)?> ::std::fmt::Debug for $name<$s $(, $n)?> {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.debug_tuple(stringify!($name))
                    .field(&self.0.as_slice())
                    .finish()
            }
        }

        impl<$s: $crate::math::Scalar $(, const $n: usize)?> ::std::fmt::Display
            for $name<$s $(, $n)?>
        {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&$crate::math::display_matrix(&self.0), f)
            }
        }

        impl<$s $(, const $n: usize)?> ::approx::AbsDiffEq for $name<$s $(, $n)?>
        where
            $s: $crate::math::Scalar + ::approx::AbsDiffEq,
            $s::Epsilon: Copy,
        {
            type Epsilon = $s::Epsilon;

            fn default_epsilon() -> Self::Epsilon { $s::default_epsilon() }

            fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
                self.0.abs_diff_eq(&other.0, epsilon)
            }
        }

        impl<$s $(, const $n: usize)?> ::approx::RelativeEq for $name<$s $(, $n)?>
        where
            $s: $crate::math::Scalar + ::approx::RelativeEq,
            $s::Epsilon: Copy,
        {
            fn default_max_relative() -> Self::Epsilon { $s::default_max_relative() }

            fn relative_eq(
                &self,
                other: &Self,
                epsilon: Self::Epsilon,
                max_relative: Self::Epsilon,
            ) -> bool {
                self.0.relative_eq(&other.0, epsilon, max_relative)
            }
        }

        impl<$s $(, const $n: usize)?> ::approx::UlpsEq for $name<$s $(, $n)?>
        where
            $s: $crate::math::Scalar + ::approx::UlpsEq,
            $s::Epsilon: Copy,
        {
            fn default_max_ulps() -> u32 { $s::default_max_ulps() }

            fn ulps_eq(&self, other: &Self, epsilon: Self::Epsilon, max_ulps: u32) -> bool {
                self.0.ulps_eq(&other.0, epsilon, max_ulps)
            }
        }
    };
}

/// Implements the vector-space operations (sum, difference, negation and
/// scaling) for a primitive whose values form a vector space, i.e. vectors
/// and normals but not points.
macro_rules! impl_linear_ops {
    ($name:ident<$s:ident $(, const $n:ident: usize)?>) => {
        impl<$s: $crate::math::Scalar $(, const $n: usize)?> $name<$s $(, $n)?> {
            /// Dot product.
            #[inline]
            pub fn dot(&self, rhs: &Self) -> $s {
                self.0
                    .iter()
                    .zip(rhs.0.iter())
                    .fold(<$s as ::num_traits::Zero>::zero(), |acc, (a, b)| acc + *a * *b)
            }
        }

        impl<$s: $crate::math::Real $(, const $n: usize)?> $name<$s $(, $n)?> {
            /// Euclidean length.
            #[inline]
            pub fn norm(&self) -> $s { self.0.norm() }

            /// Squared euclidean length.
            #[inline]
            pub fn norm_squared(&self) -> $s { self.0.norm_squared() }

            /// Returns a unit-length copy.
            #[inline]
            pub fn normalize(&self) -> Self { Self(self.0.normalize()) }
        }

        impl<$s: $crate::math::Scalar $(, const $n: usize)?> ::std::ops::Add for $name<$s $(, $n)?> {
            type Output = Self;

            #[inline]
            fn add(self, rhs: Self) -> Self { Self(self.0.zip_map(&rhs.0, |a, b| a + b)) }
        }

        impl<$s: $crate::math::Scalar $(, const $n: usize)?> ::std::ops::Sub for $name<$s $(, $n)?> {
            type Output = Self;

            #[inline]
            fn sub(self, rhs: Self) -> Self { Self(self.0.zip_map(&rhs.0, |a, b| a - b)) }
        }

        impl<$s $(, const $n: usize)?> ::std::ops::Neg for $name<$s $(, $n)?>
        where
            $s: $crate::math::Scalar + ::std::ops::Neg<Output = $s>,
        {
            type Output = Self;

            #[inline]
            fn neg(self) -> Self { Self(self.0.map(|a| -a)) }
        }

        impl<$s: $crate::math::Scalar $(, const $n: usize)?> ::std::ops::Mul<$s> for $name<$s $(, $n)?> {
            type Output = Self;

            #[inline]
            fn mul(self, rhs: $s) -> Self { Self(self.0.map(|a| a * rhs)) }
        }

        impl<$s: $crate::math::Scalar $(, const $n: usize)?> ::std::ops::Div<$s> for $name<$s $(, $n)?> {
            type Output = Self;

            #[inline]
            fn div(self, rhs: $s) -> Self { Self(self.0.map(|a| a / rhs)) }
        }

        impl<$s: $crate::math::Scalar $(, const $n: usize)?> ::std::ops::AddAssign
            for $name<$s $(, $n)?>
        {
            #[inline]
            fn add_assign(&mut self, rhs: Self) { *self = *self + rhs; }
        }

        impl<$s: $crate::math::Scalar $(, const $n: usize)?> ::std::ops::SubAssign
            for $name<$s $(, $n)?>
        {
            #[inline]
            fn sub_assign(&mut self, rhs: Self) { *self = *self - rhs; }
        }

        impl<$s: $crate::math::Scalar $(, const $n: usize)?> ::std::ops::MulAssign<$s>
            for $name<$s $(, $n)?>
        {
            #[inline]
            fn mul_assign(&mut self, rhs: $s) { *self = *self * rhs; }
        }

        impl<$s: $crate::math::Scalar $(, const $n: usize)?> ::std::ops::DivAssign<$s>
            for $name<$s $(, $n)?>
        {
            #[inline]
            fn div_assign(&mut self, rhs: $s) { *self = *self / rhs; }
        }
    };
}

pub(crate) use impl_linear_ops;
pub(crate) use impl_storage;
