// src/noyau/lexeur.rs
//
// Lexeur : une passe avant, un jeton émis par itération.
// - fin de ligne (Eol) toujours émise en dernier
// - `#` : commentaire, on émet Eol et on s’arrête
// - moins unaire décidé ici (pas à l’évaluation)
// - toute erreur arrête le balayage, aucun jeton partiel n’est rendu

use tracing::trace;

use super::erreur::CalcError;
use super::jetons::{Token, TokenKind};
use super::rationnel::EXPOSANT_LITTERAL_MAX;

fn is_ident_debut(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_suite(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_nombre(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

/// Vérifie qu’une chaîne respecte la grammaire des identifiants
/// (lettre ou `_`, puis lettres, chiffres, `_`).
pub fn is_valid_ident(s: &str) -> bool {
    let mut it = s.chars();
    match it.next() {
        Some(c) if is_ident_debut(c) => it.all(is_ident_suite),
        _ => false,
    }
}

struct Lexeur {
    chars: Vec<char>,
    pos: usize,   // prochain caractère à lire
    start: usize, // début du lexème courant
    tokens: Vec<Token>,
}

/// Tokenise une expression. Le dernier jeton est toujours `Eol`.
pub fn lex(source: &str) -> Result<Vec<Token>, CalcError> {
    let mut l = Lexeur {
        chars: source.chars().collect(),
        pos: 0,
        start: 0,
        tokens: Vec::new(),
    };
    l.lex()?;
    trace!(jetons = l.tokens.len(), "lexage terminé");
    Ok(l.tokens)
}

impl Lexeur {
    fn lex(&mut self) -> Result<(), CalcError> {
        loop {
            self.start = self.pos;

            let Some(c) = self.eat() else {
                self.emit(TokenKind::Eol);
                return Ok(());
            };

            if c.is_whitespace() {
                continue;
            }
            if is_ident_debut(c) {
                self.read_ident();
                continue;
            }
            if is_nombre(c) {
                self.read_number(c)?;
                continue;
            }

            match c {
                '+' => self.switch_eq(TokenKind::Add, TokenKind::AddEq),
                '-' => {
                    if self.is_negation() && self.peek() != Some('=') {
                        self.emit(TokenKind::UnaryMin);
                    } else {
                        self.switch_eq(TokenKind::Sub, TokenKind::SubEq);
                    }
                }
                '/' => self.switch_eq(TokenKind::Div, TokenKind::DivEq),
                '*' => {
                    if self.peek() == Some('*') {
                        self.eat();
                        self.switch_eq(TokenKind::Pow, TokenKind::PowEq);
                    } else {
                        self.switch_eq(TokenKind::Mul, TokenKind::MulEq);
                    }
                }
                '%' => self.switch_eq(TokenKind::Rem, TokenKind::RemEq),
                '&' => self.switch_eq(TokenKind::And, TokenKind::AndEq),
                '|' => self.switch_eq(TokenKind::Or, TokenKind::OrEq),
                '^' => self.switch_eq(TokenKind::Xor, TokenKind::XorEq),
                '<' => {
                    if self.peek() == Some('<') {
                        self.eat();
                        self.switch_eq(TokenKind::Lsh, TokenKind::LshEq);
                    } else {
                        self.switch_eq(TokenKind::Lt, TokenKind::LtEq);
                    }
                }
                '>' => {
                    if self.peek() == Some('>') {
                        self.eat();
                        self.switch_eq(TokenKind::Rsh, TokenKind::RshEq);
                    } else {
                        self.switch_eq(TokenKind::Gt, TokenKind::GtEq);
                    }
                }
                '~' => self.emit(TokenKind::Not),
                '=' => self.switch_eq(TokenKind::Eq, TokenKind::EqEq),
                '!' => {
                    if self.peek() != Some('=') {
                        let message = format!("opération invalide ‘{c}’ (attendu ‘!=’)");
                        return Err(self.erreur(message));
                    }
                    self.eat();
                    self.emit(TokenKind::NotEq);
                }
                '(' => self.emit(TokenKind::LParen),
                ')' => self.emit(TokenKind::RParen),
                ',' => self.emit(TokenKind::Comma),
                '#' => {
                    // commentaire : le reste de la ligne est ignoré
                    self.start = self.chars.len();
                    self.emit(TokenKind::Eol);
                    return Ok(());
                }
                _ => return Err(self.erreur(format!("caractère inattendu ‘{c}’"))),
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn eat(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn emit(&mut self, kind: TokenKind) {
        let end = self.pos.min(self.chars.len());
        let start = self.start.min(end);
        let lexeme: String = self.chars[start..end].iter().collect();
        self.tokens.push(Token::new(kind, lexeme, self.start));
    }

    fn erreur(&self, message: String) -> CalcError {
        CalcError::Lexicale {
            message,
            position: self.start,
        }
    }

    /// `-` unaire : début d’expression, après `(`, après `,`, ou après un opérateur.
    fn is_negation(&self) -> bool {
        match self.tokens.last() {
            None => true,
            Some(prev) => {
                prev.is(TokenKind::LParen) || prev.is(TokenKind::Comma) || prev.is_operator()
            }
        }
    }

    fn switch_eq(&mut self, sans: TokenKind, avec: TokenKind) {
        if self.peek() == Some('=') {
            self.eat();
            self.emit(avec);
        } else {
            self.emit(sans);
        }
    }

    fn read_ident(&mut self) {
        while self.peek().is_some_and(is_ident_suite) {
            self.eat();
        }
        self.emit(TokenKind::Ident);
    }

    fn read_number(&mut self, premier: char) -> Result<(), CalcError> {
        if premier == '0' {
            let base = match self.peek() {
                Some('x' | 'X') => Some((TokenKind::Hex, 16, "hexadécimal")),
                Some('b' | 'B') => Some((TokenKind::Binary, 2, "binaire")),
                Some('o' | 'O') => Some((TokenKind::Octal, 8, "octal")),
                _ => None,
            };
            if let Some((kind, radix, nom)) = base {
                self.eat();
                return self.read_radix(kind, radix, nom);
            }
        }

        // Littéral décimal : chiffres et points, exposant optionnel e[-]chiffres
        let mut points = usize::from(premier == '.');
        while let Some(c) = self.peek() {
            if is_nombre(c) {
                points += usize::from(c == '.');
                self.eat();
            } else if c == 'e' || c == 'E' {
                self.eat();
                if self.peek() == Some('-') {
                    self.eat();
                }
                let debut_exposant = self.pos;
                while self.peek().is_some_and(|d| d.is_ascii_digit()) {
                    self.eat();
                }
                let lexeme: String = self.chars[self.start..self.pos].iter().collect();
                if self.pos == debut_exposant {
                    return Err(self.erreur(format!("exposant sans chiffres ‘{lexeme}’")));
                }
                let exposant: String = self.chars[debut_exposant..self.pos].iter().collect();
                if !exposant.parse::<u32>().is_ok_and(|e| e <= EXPOSANT_LITTERAL_MAX) {
                    return Err(self.erreur(format!("nombre invalide ‘{lexeme}’")));
                }
                break;
            } else {
                break;
            }
        }

        let lexeme: String = self.chars[self.start..self.pos].iter().collect();
        let mantisse = lexeme.split(['e', 'E']).next().unwrap_or_default();
        if points > 1 || !mantisse.chars().any(|c| c.is_ascii_digit()) {
            return Err(self.erreur(format!("nombre invalide ‘{lexeme}’")));
        }

        self.emit(TokenKind::Decimal);
        Ok(())
    }

    fn read_radix(&mut self, kind: TokenKind, radix: u32, nom: &str) -> Result<(), CalcError> {
        let debut_chiffres = self.pos;
        while self.peek().is_some_and(|c| c.is_digit(radix)) {
            self.eat();
        }

        // Un caractère alphanumérique collé au littéral est un chiffre invalide pour la base.
        if let Some(c) = self.peek() {
            if is_ident_suite(c) || c == '.' {
                return Err(CalcError::Lexicale {
                    message: format!("chiffre invalide ‘{c}’ pour un littéral {nom}"),
                    position: self.pos,
                });
            }
        }
        if self.pos == debut_chiffres {
            return Err(self.erreur(format!("littéral {nom} sans chiffres")));
        }

        self.emit(kind);
        Ok(())
    }
}
