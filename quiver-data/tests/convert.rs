use std::fs;

use quiver_data::{convert_csv, load, ConvertError, CsvOptions};
use tempfile::tempdir;

#[test]
fn converts_close_column_to_array_file() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("ohlcvt.csv");
    let output = temp.path().join("close_prices.npy");
    fs::write(
        &input,
        "1,0.40,0.42,0.39,0.41,1000,12\n2,0.41,0.45,0.40,0.44,800,9\n",
    )
    .unwrap();

    let rows = convert_csv(&input, &output, &CsvOptions::default()).unwrap();

    assert_eq!(rows, 2);
    assert_eq!(load(&output).unwrap(), vec![0.41, 0.44]);
}

#[test]
fn missing_csv_is_an_open_error() {
    let temp = tempdir().unwrap();
    let output = temp.path().join("never.npy");
    let err = convert_csv(
        temp.path().join("absent.csv"),
        &output,
        &CsvOptions::default(),
    )
    .unwrap_err();

    assert!(matches!(err, ConvertError::Open { .. }), "{err:?}");
    assert!(!output.exists());
}
