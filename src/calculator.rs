/// Expression-entry state for the calculator pane. Purely local: the
/// buffer is edited here, and evaluation happens on the backend via
/// `POST /api/calculate`, whose outcome is applied with [`apply_result`].
#[derive(Debug)]
pub struct Calculator {
    buffer: String,
    reset_on_next_input: bool,
}

const OPERATORS: [char; 4] = ['+', '-', '×', '÷'];

impl Calculator {
    pub fn new() -> Self {
        Self {
            buffer: "0".to_string(),
            reset_on_next_input: false,
        }
    }

    pub fn display(&self) -> &str {
        &self.buffer
    }

    pub fn press_digit(&mut self, digit: char) {
        if self.reset_on_next_input {
            self.buffer = if digit == '.' {
                "0.".to_string()
            } else {
                digit.to_string()
            };
            self.reset_on_next_input = false;
        } else if self.buffer == "0" && digit != '.' {
            self.buffer = digit.to_string();
        } else {
            self.buffer.push(digit);
        }
    }

    pub fn press_operator(&mut self, op: char) {
        // An expression never starts with an operator.
        if self.buffer == "0" {
            return;
        }
        if self.buffer.ends_with(|c| OPERATORS.contains(&c)) {
            self.buffer.pop();
        }
        self.buffer.push(op);
        self.reset_on_next_input = false;
    }

    pub fn clear(&mut self) {
        self.buffer = "0".to_string();
        self.reset_on_next_input = false;
    }

    /// The expression as the backend expects it, with the display glyphs
    /// mapped back to `*` and `/`.
    pub fn expression(&self) -> String {
        self.buffer.replace('×', "*").replace('÷', "/")
    }

    /// Applies the backend's answer to the display: the result value on
    /// success, the `Error` marker otherwise. Either way the next digit
    /// starts a fresh expression.
    pub fn apply_result(&mut self, outcome: Result<String, String>) {
        self.buffer = match outcome {
            Ok(value) => value,
            Err(_) => "Error".to_string(),
        };
        self.reset_on_next_input = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_replace_initial_zero() {
        let mut calc = Calculator::new();
        calc.press_digit('1');
        calc.press_digit('2');
        assert_eq!(calc.display(), "12");
    }

    #[test]
    fn test_leading_decimal_keeps_zero() {
        let mut calc = Calculator::new();
        calc.press_digit('.');
        calc.press_digit('5');
        assert_eq!(calc.display(), "0.5");
    }

    #[test]
    fn test_operator_ignored_on_empty_expression() {
        let mut calc = Calculator::new();
        calc.press_operator('+');
        assert_eq!(calc.display(), "0");
    }

    #[test]
    fn test_trailing_operator_is_replaced() {
        let mut calc = Calculator::new();
        calc.press_digit('7');
        calc.press_operator('+');
        calc.press_operator('×');
        assert_eq!(calc.display(), "7×");
    }

    #[test]
    fn test_expression_maps_display_glyphs() {
        let mut calc = Calculator::new();
        calc.press_digit('8');
        calc.press_operator('×');
        calc.press_digit('2');
        calc.press_operator('÷');
        calc.press_digit('4');
        assert_eq!(calc.expression(), "8*2/4");
    }

    #[test]
    fn test_equals_with_backend_result() {
        let mut calc = Calculator::new();
        calc.press_digit('1');
        calc.press_operator('+');
        calc.press_digit('2');
        assert_eq!(calc.expression(), "1+2");

        calc.apply_result(Ok("3".to_string()));
        assert_eq!(calc.display(), "3");

        // Next digit starts over rather than appending to the result.
        calc.press_digit('4');
        assert_eq!(calc.display(), "4");
    }

    #[test]
    fn test_equals_with_backend_error() {
        let mut calc = Calculator::new();
        calc.press_digit('1');
        calc.press_operator('÷');
        calc.press_digit('0');
        calc.apply_result(Err("Invalid expression: division by zero".into()));
        assert_eq!(calc.display(), "Error");
    }

    #[test]
    fn test_clear_resets_buffer() {
        let mut calc = Calculator::new();
        calc.press_digit('9');
        calc.press_operator('-');
        calc.clear();
        assert_eq!(calc.display(), "0");
        calc.press_operator('+');
        assert_eq!(calc.display(), "0");
    }
}
