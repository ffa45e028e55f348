use crate::model::{validate_radius, Coordinate, PostRequest, ValidationError};
use crate::protocol::parser::RespValue;

/// 参数解析工具
pub struct ArgumentParser<'a> {
    args: &'a [RespValue],
    command_name: &'static str,
}

/// POST 命令参数
#[derive(Debug, Clone, PartialEq)]
pub struct PostArgs {
    pub request: PostRequest,
}

/// NEARBY 命令参数
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyArgs {
    pub coordinate: Coordinate,
    pub radius_km: f64,
}

impl<'a> ArgumentParser<'a> {
    pub fn new(args: &'a [RespValue], command_name: &'static str) -> Self {
        Self { args, command_name }
    }

    /// 检查参数数量
    pub fn check_arg_count(&self, expected: usize) -> Result<(), String> {
        if self.args.len() != expected {
            return Err(format!(
                "ERR wrong number of arguments for '{}' command. Expected {}, got {}",
                self.command_name,
                expected,
                self.args.len()
            ));
        }
        Ok(())
    }

    /// 检查最少参数数量
    pub fn check_min_args(&self, minimum: usize, usage: &str) -> Result<(), String> {
        if self.args.len() < minimum {
            return Err(format!(
                "ERR wrong number of arguments for '{}' command. Expected at least {}, got {}. Usage: {}",
                self.command_name,
                minimum,
                self.args.len(),
                usage
            ));
        }
        Ok(())
    }

    /// 获取字符串参数
    pub fn get_string(&self, index: usize, param_name: &str) -> Result<&'a str, String> {
        match self.args.get(index) {
            Some(RespValue::BulkString(Some(s))) => Ok(s),
            Some(RespValue::SimpleString(s)) => Ok(s),
            Some(_) => Err(format!("ERR invalid {}: expected string", param_name)),
            None => Err(format!("ERR missing {} parameter", param_name)),
        }
    }

    /// 获取浮点数参数
    pub fn get_f64(&self, index: usize, param_name: &str) -> Result<f64, String> {
        let str_val = self.get_string(index, param_name)?;
        str_val
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("ERR invalid {}: expected a number", param_name))
    }

    /// 获取整数参数
    pub fn get_i64(&self, index: usize, param_name: &str) -> Result<i64, String> {
        match self.args.get(index) {
            Some(RespValue::Integer(n)) => Ok(*n),
            _ => {
                let str_val = self.get_string(index, param_name)?;
                str_val
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| format!("ERR invalid {}: expected an integer", param_name))
            }
        }
    }

    /// 从 `index` 和 `index + 1` 读取纬度、经度并校验范围
    pub fn get_coordinate(&self, index: usize) -> Result<Coordinate, String> {
        let latitude = self.get_f64(index, "latitude")?;
        let longitude = self.get_f64(index + 1, "longitude")?;
        let coordinate = Coordinate::new(latitude, longitude);
        if !coordinate.is_valid() {
            return Err(validation_message(&ValidationError::InvalidCoordinate));
        }
        Ok(coordinate)
    }

    /// 解析 POST 命令的参数
    /// 语法: POST lat lon duration content...
    ///
    /// 内容中的空格可以放在一个参数里，也可以拆成多个参数（按空格拼接）。
    pub fn parse_post_args(&self) -> Result<PostArgs, String> {
        self.check_min_args(4, "POST lat lon duration content")?;

        let location = self.get_coordinate(0)?;
        let duration = self.get_i64(2, "duration")?;

        let mut words = Vec::with_capacity(self.args.len() - 3);
        for index in 3..self.args.len() {
            words.push(self.get_string(index, "content")?);
        }

        let request = PostRequest::new(location, words.join(" "), duration);
        request.validate().map_err(|e| validation_message(&e))?;

        Ok(PostArgs { request })
    }

    /// 解析 NEARBY 命令的参数
    /// 语法: NEARBY lat lon radius_km
    ///
    /// # Examples
    ///
    /// ```ignore
    /// NEARBY 48.8566 2.3522 5
    /// ```
    pub fn parse_nearby_args(&self) -> Result<NearbyArgs, String> {
        self.check_arg_count(3)?;

        let coordinate = self.get_coordinate(0)?;
        let radius_km = self.get_f64(2, "radius")?;
        let radius_km = validate_radius(radius_km).map_err(|e| validation_message(&e))?;

        Ok(NearbyArgs {
            coordinate,
            radius_km,
        })
    }
}

fn validation_message(error: &ValidationError) -> String {
    format!("ERR {}", error)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bulk_args(args: &[&str]) -> Vec<RespValue> {
        args.iter()
            .map(|s| RespValue::BulkString(Some(s.to_string())))
            .collect()
    }

    #[test]
    fn test_parse_nearby_args() {
        let args = bulk_args(&["10.5", "-20.25", "3"]);
        let parsed = ArgumentParser::new(&args, "NEARBY")
            .parse_nearby_args()
            .unwrap();
        assert_eq!(parsed.coordinate, Coordinate::new(10.5, -20.25));
        assert_eq!(parsed.radius_km, 3.0);
    }

    #[test]
    fn test_parse_nearby_rejects_bad_input() {
        let parse = |args: &[&str]| {
            let args = bulk_args(args);
            ArgumentParser::new(&args, "NEARBY").parse_nearby_args()
        };

        let err = parse(&["10", "10"]).unwrap_err();
        assert!(err.contains("wrong number of arguments"));

        let err = parse(&["abc", "10", "1"]).unwrap_err();
        assert!(err.contains("invalid latitude"));

        let err = parse(&["95", "10", "1"]).unwrap_err();
        assert!(err.contains("invalid location"));

        let err = parse(&["10", "10", "-1"]).unwrap_err();
        assert!(err.contains("invalid radius"));

        let err = parse(&["10", "10", "NaN"]).unwrap_err();
        assert!(err.contains("invalid radius"));
    }

    #[test]
    fn test_parse_post_args_joins_content() {
        let args = bulk_args(&["10", "10", "60", "free", "coffee", "here"]);
        let parsed = ArgumentParser::new(&args, "POST").parse_post_args().unwrap();

        assert_eq!(parsed.request.content, "free coffee here");
        assert_eq!(parsed.request.duration, 60);
        assert_eq!(parsed.request.location, Coordinate::new(10.0, 10.0));
    }

    #[test]
    fn test_parse_post_args_single_content_argument() {
        let args = bulk_args(&["10", "10", "60", "free coffee here"]);
        let parsed = ArgumentParser::new(&args, "POST").parse_post_args().unwrap();
        assert_eq!(parsed.request.content, "free coffee here");
    }

    #[test]
    fn test_parse_post_args_validation() {
        let parse = |args: &[&str]| {
            let args = bulk_args(args);
            ArgumentParser::new(&args, "POST").parse_post_args()
        };

        assert!(parse(&["10", "10", "60"])
            .unwrap_err()
            .contains("wrong number of arguments"));
        assert!(parse(&["10", "200", "60", "hi"])
            .unwrap_err()
            .contains("invalid location"));
        assert!(parse(&["10", "10", "3600", "hi"])
            .unwrap_err()
            .contains("invalid duration"));
        assert!(parse(&["10", "10", "0", "hi"])
            .unwrap_err()
            .contains("invalid duration"));
        assert!(parse(&["10", "10", "sixty", "hi"])
            .unwrap_err()
            .contains("invalid duration"));
        assert!(parse(&["10", "10", "60", ""])
            .unwrap_err()
            .contains("invalid content"));
    }

    #[test]
    fn test_integer_argument_accepted_for_duration() {
        let args = vec![
            RespValue::BulkString(Some("1".to_string())),
            RespValue::BulkString(Some("2".to_string())),
            RespValue::Integer(30),
            RespValue::BulkString(Some("hi".to_string())),
        ];
        let parsed = ArgumentParser::new(&args, "POST").parse_post_args().unwrap();
        assert_eq!(parsed.request.duration, 30);
    }
}
