use bumpalo::Bump;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fastlint_ast::NullVisitor;
use fastlint_parser::{Parser, ParserOptions};

// A medium-size TypeScript source with various constructs.
const TYPESCRIPT_SOURCE: &str = r#"
interface User {
    id: number;
    name: string;
    email: string;
    preferences: UserPreferences;
}

interface UserPreferences {
    theme: string;
    notifications: boolean;
}

type UserID = number;

class UserService {
    users;
    nextId;

    constructor() {
        this.users = new Map();
        this.nextId = 1;
    }

    createUser(name: string, email: string): User {
        const user = {
            id: this.nextId++,
            name,
            email,
            preferences: {
                theme: 'light',
                notifications: true
            }
        };
        this.users.set(user.id, user);
        return user;
    }

    getUserById(id: UserID) {
        return this.users.get(id);
    }

    deleteUser(id: UserID) {
        return this.users.delete(id);
    }
}

function filterUsers<T>(users: T[], predicate: (user: T) => boolean): T[] {
    return users.filter(predicate);
}

async function fetchUserData(id: UserID) {
    const service = new UserService();
    return service.getUserById(id) || null;
}

const processUsers = (users: User[]): number => {
    return users.reduce((count, user) => {
        if (user.age && user.age > 18) {
            return count + 1;
        }
        return count;
    }, 0);
};

for (let i = 0; i < 100; ++i) {
    processUsers([]);
}

export { UserService };
export default processUsers;
"#;

fn bench_parse_typescript(c: &mut Criterion) {
    c.bench_function("parse_typescript_medium", |b| {
        b.iter(|| {
            let arena = Bump::new();
            let mut parser = Parser::new(
                &arena,
                black_box(TYPESCRIPT_SOURCE),
                ParserOptions {
                    typescript: true,
                    jsx: false,
                },
            );
            let mut visitor = NullVisitor;
            parser.parse_and_visit_module(&mut visitor);
            black_box(parser.take_diagnostics());
        });
    });
}

criterion_group!(benches, bench_parse_typescript);
criterion_main!(benches);
