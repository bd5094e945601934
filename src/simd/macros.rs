//! Operator boilerplate shared by the native lane vectors.
//!
//! Every native type provides the same operator set; these macros stamp it
//! out from one body expression per operation so the backends only spell the
//! intrinsic that differs.

/// Elementwise arithmetic: vector⊕vector, vector⊕scalar, scalar⊕vector and
/// the compound-assign forms.
macro_rules! impl_arith_op {
    ($ty:ty, $scalar:ty, $op:ident, $method:ident, $op_assign:ident, $method_assign:ident,
     |$a:ident, $b:ident| $body:expr) => {
        impl std::ops::$op for $ty {
            type Output = $ty;

            #[inline(always)]
            fn $method(self, rhs: $ty) -> $ty {
                let $a = self;
                let $b = rhs;
                $body
            }
        }

        impl std::ops::$op<$scalar> for $ty {
            type Output = $ty;

            #[inline(always)]
            fn $method(self, rhs: $scalar) -> $ty {
                std::ops::$op::$method(self, <$ty as $crate::simd::SimdVec>::splat(rhs))
            }
        }

        impl std::ops::$op<$ty> for $scalar {
            type Output = $ty;

            #[inline(always)]
            fn $method(self, rhs: $ty) -> $ty {
                std::ops::$op::$method(<$ty as $crate::simd::SimdVec>::splat(self), rhs)
            }
        }

        impl std::ops::$op_assign for $ty {
            #[inline(always)]
            fn $method_assign(&mut self, rhs: $ty) {
                *self = std::ops::$op::$method(*self, rhs);
            }
        }

        impl std::ops::$op_assign<$scalar> for $ty {
            #[inline(always)]
            fn $method_assign(&mut self, rhs: $scalar) {
                *self = std::ops::$op::$method(*self, rhs);
            }
        }
    };
}

/// Bitwise operators, meant for mask vectors but valid on any bit pattern.
macro_rules! impl_bit_op {
    ($ty:ty, $op:ident, $method:ident, $op_assign:ident, $method_assign:ident,
     |$a:ident, $b:ident| $body:expr) => {
        impl std::ops::$op for $ty {
            type Output = $ty;

            #[inline(always)]
            fn $method(self, rhs: $ty) -> $ty {
                let $a = self;
                let $b = rhs;
                $body
            }
        }

        impl std::ops::$op_assign for $ty {
            #[inline(always)]
            fn $method_assign(&mut self, rhs: $ty) {
                *self = std::ops::$op::$method(*self, rhs);
            }
        }
    };
}

/// Unary `-` and `!` in terms of the vector's own xor and mask factories.
macro_rules! impl_unary_ops {
    ($ty:ty) => {
        impl std::ops::Neg for $ty {
            type Output = $ty;

            #[inline(always)]
            fn neg(self) -> $ty {
                self ^ <$ty as $crate::simd::SimdVec>::splat(-0.0)
            }
        }

        impl std::ops::Not for $ty {
            type Output = $ty;

            #[inline(always)]
            fn not(self) -> $ty {
                self ^ <$ty as $crate::simd::SimdVec>::onemask()
            }
        }

        impl $crate::simd::Select for $ty {
            type Mask = $ty;

            #[inline(always)]
            fn select(a: $ty, b: $ty, mask: $ty) -> $ty {
                <$ty as $crate::simd::SimdVec>::blendv(a, b, mask)
            }
        }
    };
}
