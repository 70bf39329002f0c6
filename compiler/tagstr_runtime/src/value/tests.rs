use super::*;
use pretty_assertions::assert_eq;

#[test]
fn scalar_reprs() {
    assert_eq!(Value::None.repr(), "None");
    assert_eq!(Value::Bool(true).repr(), "True");
    assert_eq!(Value::Int(-7).repr(), "-7");
    assert_eq!(Value::str("it's").repr(), "\"it's\"");
    assert_eq!(Value::str("a\nb").repr(), "'a\\nb'");
}

#[test]
fn tuple_reprs() {
    assert_eq!(Value::Tuple(vec![]).repr(), "()");
    assert_eq!(Value::Tuple(vec![Value::Int(1)]).repr(), "(1,)");
    assert_eq!(
        Value::Tuple(vec![Value::Int(1), Value::str("x"), Value::None]).repr(),
        "(1, 'x', None)"
    );
}

#[test]
fn str_of_string_is_unquoted() {
    assert_eq!(Value::str("héllo").to_str(), "héllo");
    assert_eq!(Value::Float(2.5).to_str(), "2.5");
}

#[test]
fn ascii_escapes_non_ascii() {
    assert_eq!(Value::str("héllo").ascii(), "'h\\xe9llo'");
    assert_eq!(Value::str("π").ascii(), "'\\u03c0'");
    assert_eq!(Value::Int(3).ascii(), "3");
}

#[test]
fn float_reprs() {
    assert_eq!(float_repr(1.0), "1.0");
    assert_eq!(float_repr(-2.5), "-2.5");
    assert_eq!(float_repr(0.1), "0.1");
    assert_eq!(float_repr(123.456), "123.456");
    assert_eq!(float_repr(0.0001), "0.0001");
    assert_eq!(float_repr(0.00001), "1e-05");
    assert_eq!(float_repr(1.5e-7), "1.5e-07");
    assert_eq!(float_repr(1e15), "1000000000000000.0");
    assert_eq!(float_repr(1e16), "1e+16");
    assert_eq!(float_repr(-1.25e100), "-1.25e+100");
    assert_eq!(float_repr(-0.0), "-0.0");
    assert_eq!(float_repr(f64::INFINITY), "inf");
    assert_eq!(float_repr(f64::NAN), "nan");
}

#[test]
fn callables_compare_by_identity() {
    let f = Value::callable(|| Value::Int(1));
    assert_eq!(f, f.clone());
    assert_ne!(f, Value::callable(|| Value::Int(1)));
    assert_eq!(f.repr(), "<function <lambda>>");
}
