// fprobe/src/decode/tests.rs

//! Tests for array decoding.

use super::*;
use crate::types::{parse_type, ParamValue, TypeDescriptor};
use ndarray::{arr1, ArrayD, Axis};

fn integers(decoded: &DecodedArray) -> &ArrayD<i8> {
    match decoded {
        DecodedArray::I8 { values, .. } => values,
        other => panic!("expected i8 values, got {:?}", other),
    }
}

fn real(kind: i64, shape: Vec<usize>) -> TypeDescriptor {
    TypeDescriptor::scalar("real")
        .with_parameter("kind", ParamValue::Int(kind))
        .with_shape(shape)
}

#[test]
fn test_groups_of_one_decode_as_f64() {
    let decoded = decode_array("(1.0) (2.0) (3.0)", &real(8, vec![3])).unwrap();
    assert_eq!(decoded.element_type(), ElementType::F64);
    assert_eq!(decoded.as_f64().unwrap().as_slice().unwrap(), &[1.0, 2.0, 3.0]);
}

#[test]
fn test_bad_token_becomes_nan() {
    let decoded = decode_array("(1.0, bad, 3.0)", &real(4, vec![3])).unwrap();
    let values = match &decoded {
        DecodedArray::F32(values) => values,
        other => panic!("expected f32 values, got {:?}", other),
    };
    assert_eq!(values[[0]], 1.0);
    assert!(values[[1]].is_nan());
    assert_eq!(values[[2]], 3.0);
    assert_eq!(decoded.sentinel_count(), 1);
}

#[test]
fn test_single_malformed_token_in_long_array() {
    let mut tokens: Vec<String> = (0..100).map(|i| format!("{}.5", i)).collect();
    tokens[57] = "<error: Cannot access memory at address 0x0>".to_string();
    let raw = format!("({})", tokens.join(", "));

    let decoded = decode_array(&raw, &real(8, vec![100])).unwrap();
    let values = decoded.as_f64().unwrap();
    for (i, v) in values.iter().enumerate() {
        if i == 57 {
            assert!(v.is_nan());
        } else {
            assert_eq!(*v, i as f64 + 0.5);
        }
    }
}

#[test]
fn test_column_major_reshape() {
    let decoded = decode_array("((0, 1) (2, 3) (4, 5))", &real(8, vec![2, 3])).unwrap();
    let values = decoded.as_f64().unwrap();
    assert_eq!(values.shape(), &[2, 3]);
    // flat index 1 lands in row 1, column 0
    assert_eq!(values[[1, 0]], 1.0);
    assert_eq!(values[[0, 1]], 2.0);
    assert_eq!(values[[1, 2]], 5.0);
    assert_eq!(values.index_axis(Axis(1), 1), arr1(&[2.0, 3.0]).into_dyn());
    assert!(values.t().is_standard_layout());
}

#[test]
fn test_column_major_flatten_recovers_token_order() {
    for shape in [vec![6], vec![2, 3], vec![3, 2], vec![1, 2, 3], vec![2, 1, 3]] {
        let size: usize = shape.iter().product();
        let tokens: Vec<String> = (0..size).map(|i| i.to_string()).collect();
        let (decoded, invalid) = decode_elements::<f64>(&tokens, &shape).unwrap();
        assert!(invalid.iter().all(|&bad| !bad));

        let flat: Vec<f64> = decoded.t().iter().copied().collect();
        let expected: Vec<f64> = (0..size).map(|i| i as f64).collect();
        assert_eq!(flat, expected, "shape {:?}", shape);
        assert_eq!(decoded.as_slice_memory_order().unwrap(), expected.as_slice());
    }
}

#[test]
fn test_three_dimensional_value() {
    let desc = parse_type("integer(kind=4) (2,2,2)").unwrap();
    let decoded = decode_array("(((1, 2) (3, 4)) ((5, 6) (7, 8)))", &desc).unwrap();
    let values = integers(&decoded);
    assert_eq!(values[[0, 0, 0]], 1);
    assert_eq!(values[[1, 0, 0]], 2);
    assert_eq!(values[[0, 1, 0]], 3);
    assert_eq!(values[[0, 0, 1]], 5);
    assert_eq!(values[[1, 1, 1]], 8);
}

#[test]
fn test_integer_overflow_is_sentinel() {
    let desc = parse_type("integer(kind=4) (3)").unwrap();
    let decoded = decode_array("(1, 300, -4)", &desc).unwrap();
    let values = integers(&decoded);
    assert_eq!(values.as_slice().unwrap(), &[1, i8::MIN, -4]);
    assert_eq!(decoded.sentinel_count(), 1);
    let widened = decoded.to_f64();
    assert_eq!(widened[[0]], 1.0);
    assert!(widened[[1]].is_nan());
    assert_eq!(widened[[2]], -4.0);
}

#[test]
fn test_integer_minimum_is_a_value() {
    let desc = parse_type("integer(kind=1) (3)").unwrap();
    let decoded = decode_array("(-128, 1, x)", &desc).unwrap();
    match &decoded {
        DecodedArray::I8 { values, invalid } => {
            assert_eq!(values.as_slice().unwrap(), &[-128, 1, i8::MIN]);
            assert_eq!(invalid.as_slice().unwrap(), &[false, false, true]);
        }
        other => panic!("expected i8 values, got {:?}", other),
    }
    assert_eq!(decoded.sentinel_count(), 1);
    let widened = decoded.to_f64();
    assert_eq!(widened[[0]], -128.0);
    assert_eq!(widened[[1]], 1.0);
    assert!(widened[[2]].is_nan());
}

#[test]
fn test_truncated_integers_are_invalid() {
    let desc = parse_type("integer(kind=4) (2,2)").unwrap();
    let decoded = decode_array("((5, 6) (7, ...))", &desc).unwrap();
    assert_eq!(decoded.sentinel_count(), 1);
    assert_eq!(decoded.to_f64()[[0, 1]], 7.0);
    assert!(decoded.to_f64()[[1, 1]].is_nan());
}

#[test]
fn test_shape_overflow_is_error() {
    let shape = vec![usize::MAX / 2, 3, 1];
    match decode_array("(1, 2)", &real(8, shape.clone())) {
        Err(DecodeError::ShapeOverflow { shape: found }) => assert_eq!(found, shape),
        other => panic!("expected ShapeOverflow, got {:?}", other),
    }
}

#[test]
fn test_scalar_shape_holds_one_element() {
    let decoded = decode_array("2.5", &real(8, vec![])).unwrap();
    assert_eq!(decoded.shape(), &[] as &[usize]);
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded.to_f64().iter().next(), Some(&2.5));
}

#[test]
fn test_truncated_reply_is_padded() {
    let decoded = decode_array("(1, 2, ...)", &real(8, vec![5])).unwrap();
    let values = decoded.as_f64().unwrap();
    assert_eq!(values[[1]], 2.0);
    assert!(values[[2]].is_nan());
    assert!(values[[4]].is_nan());
    assert_eq!(decoded.sentinel_count(), 3);
}

#[test]
fn test_too_many_tokens_is_mismatch() {
    let err = decode_array("(1, 2, 3, 4)", &real(8, vec![3])).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::ShapeMismatch {
            expected: 3,
            found: 4
        }
    ));
}

#[test]
fn test_zero_extent() {
    let decoded = decode_array("()", &real(4, vec![0])).unwrap();
    assert!(decoded.is_empty());
}

#[test]
fn test_unsupported_base_type() {
    let desc = parse_type("logical(kind=4) (3)").unwrap();
    let err = decode_array("(.TRUE., .FALSE., .TRUE.)", &desc).unwrap_err();
    assert!(matches!(err, DecodeError::UnsupportedType { .. }));
    assert_eq!(err.to_string(), "Unhandled type 'logical' (kind=4)");
}

#[test]
fn test_parse_flat_array() {
    let values = parse_flat_array::<f64>("(1.5, 2, -3e2)").unwrap();
    assert_eq!(values, arr1(&[1.5, 2.0, -300.0]));

    let values = parse_flat_array::<i32>("(7, 8)").unwrap();
    assert_eq!(values.len(), 2);
}

#[test]
fn test_parse_flat_array_is_strict() {
    match parse_flat_array::<f64>("(1.0, bad, 3.0)") {
        Err(DecodeError::InvalidElement { index, token }) => {
            assert_eq!(index, 1);
            assert_eq!(token, "bad");
        }
        other => panic!("expected InvalidElement, got {:?}", other),
    }
    // generic whitespace is not a separator
    assert!(parse_flat_array::<f64>("(1.0,2.0)").is_err());
}
