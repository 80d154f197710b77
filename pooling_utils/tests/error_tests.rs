use std::io;
use pooling_utils::error::UtilsError;

#[test]
fn test_io_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let path_str = "pooling.toml";
    let utils_err = UtilsError::io_with_path(io_err, path_str);

    match utils_err {
        UtilsError::Io {
            source,
            path: Some(p),
        } => {
            assert_eq!(source.kind(), io::ErrorKind::NotFound);
            assert_eq!(p, path_str);
            assert!(source.to_string().contains("file not found"));
        }
        _ => panic!("Expected UtilsError::Io variant with path"),
    }

    let io_err_no_path = io::Error::new(io::ErrorKind::Other, "other io error");
    let utils_err_no_path: UtilsError = io_err_no_path.into(); // Используем From<std::io::Error>
    match utils_err_no_path {
        UtilsError::Io { source, path: None } => {
            assert_eq!(source.kind(), io::ErrorKind::Other);
        }
        _ => panic!("Expected UtilsError::Io variant without path"),
    }
}

#[test]
fn test_config_error_formatting() {
    let err = UtilsError::Config("pooling.hidden_size должен быть > 0".to_string());
    assert_eq!(
        format!("{}", err),
        "Ошибка конфигурации: pooling.hidden_size должен быть > 0"
    );
}

#[test]
fn test_invalid_parameter_formatting() {
    let err = UtilsError::InvalidParameter("Неизвестный уровень".to_string());
    assert_eq!(format!("{}", err), "Неверный параметр: Неизвестный уровень");
}

#[test]
fn test_io_error_formatting() {
    let err = UtilsError::io_with_path(
        io::Error::new(io::ErrorKind::PermissionDenied, "access denied"),
        "pooling.toml",
    );
    assert_eq!(format!("{}", err), "Ошибка ввода-вывода: access denied");
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_generic_formatting() {
    let err = UtilsError::Generic("что-то пошло не так".to_string());
    assert!(err.to_string().ends_with("что-то пошло не так"));
}
